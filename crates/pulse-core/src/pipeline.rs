//! End-to-end risk pipeline
//!
//! For each topic, in registry order:
//! 1. Label rows by the topic median
//! 2. Select every other topic as a feature
//! 3. Train and select a classifier
//! 4. Predict risk for every row and attach an intervention plan
//!
//! A topic that cannot be trained is recorded in the report's failures and
//! left out of the risk columns; the rest of the batch carries on.

use chrono::Utc;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::features::{select_features, FeatureMatrix};
use crate::import::fingerprint;
use crate::label::label_topic;
use crate::models::{IndicatorRecord, InterventionPlan, TopicRegistry, WideTable};
use crate::planner;
use crate::predict::{AdHocInput, BatchPredictor};
use crate::report::{ModelReport, ReportRow, RiskReport, TopicCell, TopicFailure};
use crate::reshape::reshape;
use crate::trainer::{RiskModelTrainer, TrainedModel, TrainingConfig};
use crate::trend::topic_trends;

pub struct RiskPipeline {
    trainer: RiskModelTrainer,
}

impl Default for RiskPipeline {
    fn default() -> Self {
        Self::new(TrainingConfig::default())
    }
}

impl RiskPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            trainer: RiskModelTrainer::new(config),
        }
    }

    /// Reshape, train every topic and assess every row
    pub fn run(&self, records: &[IndicatorRecord]) -> RiskRun {
        let table = reshape(records);
        let trends = topic_trends(records, &table.registry);

        let mut models: Vec<TrainedModel> = Vec::new();
        let mut failures = Vec::new();
        let mut columns: Vec<Vec<bool>> = Vec::new();

        for target in table.registry.ids() {
            let topic = table.registry.name(target);
            let labels = label_topic(&table, target);
            let features = select_features(&table.registry.ids(), target);
            let x = FeatureMatrix::from_table(&table, &features);

            let trained = self
                .trainer
                .train(topic, &x, &labels, features)
                .and_then(|model| {
                    let risks = BatchPredictor::new(&model)
                        .assess_table(&table)?
                        .into_iter()
                        .map(|a| a.risk)
                        .collect::<Vec<_>>();
                    Ok((model, risks))
                });

            match trained {
                Ok((model, risks)) => {
                    models.push(model);
                    columns.push(risks);
                }
                Err(e) => {
                    let reason = match e {
                        Error::UntrainableTopic { reason, .. } => reason,
                        other => other.to_string(),
                    };
                    warn!(topic, reason = %reason, "Topic untrainable");
                    failures.push(TopicFailure {
                        topic: topic.to_string(),
                        threshold: labels.threshold,
                        reason,
                    });
                }
            }
        }

        let rows = table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| ReportRow {
                time: row.key.time,
                entity: row.key.entity.clone(),
                cells: models
                    .iter()
                    .zip(&columns)
                    .map(|(model, risks)| TopicCell {
                        risk: risks[i],
                        plan: planner::plan(&model.summary.topic, Some(risks[i])),
                    })
                    .collect(),
            })
            .collect();

        info!(
            rows = table.rows.len(),
            topics = table.registry.len(),
            trained = models.len(),
            untrainable = failures.len(),
            "Pipeline complete"
        );

        let report = RiskReport {
            generated_at: Utc::now(),
            fingerprint: fingerprint(records),
            record_count: records.len(),
            topics: table.registry.names().to_vec(),
            models: models
                .iter()
                .map(|m| ModelReport {
                    model: m.summary.clone(),
                    candidates: m.candidates.clone(),
                })
                .collect(),
            failures,
            rows,
            adhoc: None,
            trends,
        };

        RiskRun {
            table,
            models,
            report,
        }
    }
}

/// Everything one pipeline run produced
///
/// Owns the wide table and the trained models so ad-hoc rows can be
/// assessed after the batch without retraining.
#[derive(Debug)]
pub struct RiskRun {
    table: WideTable,
    models: Vec<TrainedModel>,
    report: RiskReport,
}

impl RiskRun {
    pub fn registry(&self) -> &TopicRegistry {
        &self.table.registry
    }

    pub fn table(&self) -> &WideTable {
        &self.table
    }

    pub fn models(&self) -> &[TrainedModel] {
        &self.models
    }

    pub fn report(&self) -> &RiskReport {
        &self.report
    }

    pub fn into_report(self) -> RiskReport {
        self.report
    }

    /// Build an ad-hoc row from `(topic, value)` pairs; unknown topics fail
    pub fn input<I, S>(&self, pairs: I) -> Result<AdHocInput>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        AdHocInput::from_pairs(&self.table.registry, pairs)
    }

    /// One plan per topic in the universe, in registry order
    ///
    /// Trained topics get a risk-based plan; untrainable ones the no-data
    /// plan.
    pub fn assess(&self, input: &AdHocInput) -> Result<Vec<InterventionPlan>> {
        self.table
            .registry
            .ids()
            .into_iter()
            .map(|id| {
                let topic = self.table.registry.name(id);
                let risk = match self.models.iter().find(|m| m.topic == id) {
                    Some(model) => Some(BatchPredictor::new(model).assess_input(input)?),
                    None => None,
                };
                Ok(planner::plan(topic, risk))
            })
            .collect()
    }

    /// Assess an ad-hoc row and record the plans in the report
    pub fn attach_adhoc(&mut self, input: &AdHocInput) -> Result<&[InterventionPlan]> {
        let plans = self.assess(input)?;
        let plans = self.report.adhoc.insert(plans);
        Ok(plans.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Recommendation;

    fn two_row_records() -> Vec<IndicatorRecord> {
        vec![
            IndicatorRecord::new(2020, "CA", "Asthma", 10.0),
            IndicatorRecord::new(2020, "CA", "Diabetes", 50.0),
            IndicatorRecord::new(2021, "CA", "Asthma", 20.0),
            IndicatorRecord::new(2021, "CA", "Diabetes", 60.0),
        ]
    }

    /// 40 rows across 4 years with distinct feature rows; Diabetes and Obesity move together
    fn state_records() -> Vec<IndicatorRecord> {
        let mut records = Vec::new();
        for year in 2017..2021 {
            for s in 0..10 {
                let entity = format!("State{:02}", s);
                let base = s as f64 + (year - 2017) as f64 * 0.3;
                records.push(IndicatorRecord::new(year, &entity, "Obesity", 25.0 + base));
                records.push(IndicatorRecord::new(year, &entity, "Diabetes", 8.0 + base / 2.0));
                records.push(IndicatorRecord::new(year, &entity, "Asthma", 9.0 + ((s * 7) % 5) as f64));
            }
        }
        // A topic observed for a single state stays mostly zero-filled
        records.push(IndicatorRecord::new(2020, "State00", "Rare", 1.0));
        records
    }

    #[test]
    fn test_two_row_scenario_completes() {
        let run = RiskPipeline::default().run(&two_row_records());
        let report = run.report();

        assert_eq!(run.table().rows.len(), 2);
        assert_eq!(report.topics, vec!["Asthma", "Diabetes"]);
        assert!(report.models.is_empty());
        assert_eq!(report.failures.len(), 2);
        assert_eq!(report.failure("Asthma").unwrap().threshold, 15.0);
        assert_eq!(report.failure("Diabetes").unwrap().threshold, 55.0);

        // 2021/CA sits above both medians
        for topic in ["Asthma", "Diabetes"] {
            let id = run.registry().resolve(topic).unwrap();
            assert_eq!(label_topic(run.table(), id).labels, vec![false, true], "{}", topic);
        }
        assert_eq!(report.rows.len(), 2);
        assert!(report.rows.iter().all(|r| r.cells.is_empty()));
    }

    #[test]
    fn test_two_row_scenario_adhoc_is_all_no_data() {
        let mut run = RiskPipeline::default().run(&two_row_records());
        let input = run.input([("Asthma", 12.0)]).unwrap();
        let plans = run.attach_adhoc(&input).unwrap().to_vec();

        assert_eq!(plans.len(), 2);
        assert!(plans.iter().all(|p| p.recommendation == Recommendation::NoData));
        assert_eq!(run.report().adhoc.as_deref(), Some(plans.as_slice()));
    }

    #[test]
    fn test_empty_input_gives_empty_report() {
        let run = RiskPipeline::default().run(&[]);
        let report = run.into_report();

        assert!(report.topics.is_empty());
        assert!(report.models.is_empty());
        assert!(report.failures.is_empty());
        assert!(report.rows.is_empty());
        assert!(report.trends.rows.is_empty());
    }

    #[test]
    fn test_report_follows_registry_order() {
        let run = RiskPipeline::default().run(&state_records());
        let report = run.report();

        assert_eq!(report.topics, vec!["Obesity", "Diabetes", "Asthma", "Rare"]);
        let positions: Vec<usize> = report
            .trained_topics()
            .map(|t| report.topics.iter().position(|name| name == t).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(report.model("Diabetes").is_some());

        // Rows sorted by (time, entity), one cell per trained topic
        assert_eq!(report.rows.len(), 40);
        assert_eq!(report.rows[0].time, 2017);
        assert_eq!(report.rows[0].entity, "State00");
        assert!(report.rows.iter().all(|r| r.cells.len() == report.models.len()));
        for row in &report.rows {
            for (cell, model) in row.cells.iter().zip(&report.models) {
                assert_eq!(cell.plan.topic, model.model.topic);
            }
        }
    }

    #[test]
    fn test_every_topic_is_trained_or_failed() {
        let report = RiskPipeline::default().run(&state_records()).into_report();
        assert_eq!(report.models.len() + report.failures.len(), report.topics.len());
    }

    #[test]
    fn test_zero_adhoc_row_plans_every_topic() {
        let run = RiskPipeline::default().run(&state_records());
        let plans = run.assess(&AdHocInput::zeros(run.registry())).unwrap();

        assert_eq!(plans.len(), run.registry().len());
        for (plan, topic) in plans.iter().zip(run.registry().names()) {
            assert_eq!(&plan.topic, topic);
            let trained = run.report().model(topic).is_some();
            assert_eq!(plan.recommendation != Recommendation::NoData, trained);
        }
    }

    #[test]
    fn test_unknown_adhoc_topic_rejected() {
        let run = RiskPipeline::default().run(&state_records());
        let err = run.input([("Obesty", 30.0)]).unwrap_err();
        assert!(matches!(err, Error::UnknownTopic(_)));
    }

    #[test]
    fn test_run_is_deterministic() {
        let pipeline = RiskPipeline::default();
        let a = pipeline.run(&state_records()).into_report();
        let b = pipeline.run(&state_records()).into_report();

        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(a.models, b.models);
        assert_eq!(a.rows, b.rows);
    }
}
