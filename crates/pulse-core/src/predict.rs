//! Applying trained topic models to rows

use crate::error::{Error, Result};
use crate::features::FeatureMatrix;
use crate::models::{RiskAssessment, TopicRegistry, WideTable};
use crate::trainer::TrainedModel;

/// A single user-supplied row of topic values
///
/// Values are stored in registry order; topics never set stay at 0.0.
#[derive(Debug, Clone, PartialEq)]
pub struct AdHocInput {
    values: Vec<f64>,
}

impl AdHocInput {
    /// All topics at 0.0
    pub fn zeros(registry: &TopicRegistry) -> Self {
        Self {
            values: vec![0.0; registry.len()],
        }
    }

    /// Build from `(topic name, value)` pairs, rejecting unknown topics
    pub fn from_pairs<I, S>(registry: &TopicRegistry, pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: AsRef<str>,
    {
        let mut input = Self::zeros(registry);
        for (name, value) in pairs {
            input.set(registry, name.as_ref(), value)?;
        }
        Ok(input)
    }

    /// Set one topic's value; unknown topics and non-finite values are errors
    pub fn set(&mut self, registry: &TopicRegistry, topic: &str, value: f64) -> Result<()> {
        let id = registry.resolve(topic)?;
        if !value.is_finite() {
            return Err(Error::DataShape(format!(
                "value for {} must be a finite number, got {}",
                topic, value
            )));
        }
        if self.values.len() < registry.len() {
            self.values.resize(registry.len(), 0.0);
        }
        self.values[id.index()] = value;
        Ok(())
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Runs one trained model over arbitrary rows
pub struct BatchPredictor<'a> {
    model: &'a TrainedModel,
}

impl<'a> BatchPredictor<'a> {
    pub fn new(model: &'a TrainedModel) -> Self {
        Self { model }
    }

    /// Risk for every row of the wide table, in row order
    pub fn assess_table(&self, table: &WideTable) -> Result<Vec<RiskAssessment>> {
        let x = FeatureMatrix::from_table(table, &self.model.features);
        let predictions = self.model.classifier().predict(&x)?;

        Ok(table
            .rows
            .iter()
            .zip(predictions)
            .map(|(row, risk)| RiskAssessment {
                time: row.key.time,
                entity: row.key.entity.clone(),
                topic: self.model.summary.topic.clone(),
                risk,
            })
            .collect())
    }

    /// Risk for a single ad-hoc row
    ///
    /// The row is projected onto the model's training columns; any column
    /// the input lacks is 0.0.
    pub fn assess_input(&self, input: &AdHocInput) -> Result<bool> {
        let x = FeatureMatrix::from_rows(std::iter::once(input.values()), &self.model.features);
        let predictions = self.model.classifier().predict(&x)?;
        Ok(predictions.first().copied().unwrap_or(false))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::select_features;
    use crate::label::label_topic;
    use crate::models::IndicatorRecord;
    use crate::reshape::reshape;
    use crate::trainer::RiskModelTrainer;

    fn table() -> WideTable {
        let mut records = Vec::new();
        for i in 0..20 {
            let entity = format!("S{:02}", i);
            records.push(IndicatorRecord::new(2020, &entity, "Diabetes", 5.0 + i as f64));
            records.push(IndicatorRecord::new(2020, &entity, "Obesity", 20.0 + 2.0 * i as f64));
        }
        reshape(&records)
    }

    fn trained(table: &WideTable) -> TrainedModel {
        let target = table.registry.resolve("Diabetes").unwrap();
        let labels = label_topic(table, target);
        let features = select_features(&table.registry.ids(), target);
        let x = FeatureMatrix::from_table(table, &features);
        RiskModelTrainer::default()
            .train("Diabetes", &x, &labels, features)
            .unwrap()
    }

    #[test]
    fn test_assess_table_one_per_row() {
        let table = table();
        let model = trained(&table);
        let assessments = BatchPredictor::new(&model).assess_table(&table).unwrap();

        assert_eq!(assessments.len(), table.rows.len());
        assert!(assessments.iter().all(|a| a.topic == "Diabetes"));
        assert_eq!(assessments[0].entity, "S00");
        assert!(!assessments[0].risk);
        assert!(assessments[19].risk);
    }

    #[test]
    fn test_assess_input_uses_other_topics_only() {
        let table = table();
        let model = trained(&table);
        let predictor = BatchPredictor::new(&model);

        let high = AdHocInput::from_pairs(&table.registry, [("Obesity", 60.0), ("Diabetes", 0.0)]).unwrap();
        assert!(predictor.assess_input(&high).unwrap());

        let low = AdHocInput::from_pairs(&table.registry, [("Obesity", 20.0), ("Diabetes", 99.0)]).unwrap();
        assert!(!predictor.assess_input(&low).unwrap());
    }

    #[test]
    fn test_all_default_input_still_predicts() {
        let table = table();
        let model = trained(&table);
        let input = AdHocInput::zeros(&table.registry);
        assert!(BatchPredictor::new(&model).assess_input(&input).is_ok());
    }

    #[test]
    fn test_unknown_topic_rejected() {
        let table = table();
        let err = AdHocInput::from_pairs(&table.registry, [("Diabets", 1.0)]).unwrap_err();
        assert!(matches!(err, Error::UnknownTopic(_)));
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let table = table();
        let mut input = AdHocInput::zeros(&table.registry);

        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = input.set(&table.registry, "Obesity", value).unwrap_err();
            assert!(matches!(err, Error::DataShape(_)));
        }
        assert!(input.values().iter().all(|&v| v == 0.0));

        let err = AdHocInput::from_pairs(&table.registry, [("Obesity", f64::NAN)]).unwrap_err();
        assert!(matches!(err, Error::DataShape(_)));
    }
}
