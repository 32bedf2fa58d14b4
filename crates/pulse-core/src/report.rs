//! Run report and its CSV projection

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{InterventionPlan, TopicModel};
use crate::trainer::CandidateScore;
use crate::trend::TrendTable;

/// Selected model for a topic plus every candidate's holdout result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelReport {
    #[serde(flatten)]
    pub model: TopicModel,
    pub candidates: Vec<CandidateScore>,
}

/// A topic left out of the risk columns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicFailure {
    pub topic: String,
    /// Median the labels were split on
    pub threshold: f64,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCell {
    pub risk: bool,
    pub plan: InterventionPlan,
}

/// One wide-table row with a cell per trained topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub time: i32,
    pub entity: String,
    /// Same order as [`RiskReport::models`]
    pub cells: Vec<TopicCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the cleaned input records
    pub fingerprint: String,
    pub record_count: usize,
    /// Full topic universe in registry order
    pub topics: Vec<String>,
    /// Trained topics in registry order
    pub models: Vec<ModelReport>,
    pub failures: Vec<TopicFailure>,
    pub rows: Vec<ReportRow>,
    /// One plan per topic for the ad-hoc row, when one was assessed
    pub adhoc: Option<Vec<InterventionPlan>>,
    pub trends: TrendTable,
}

impl RiskReport {
    pub fn trained_topics(&self) -> impl Iterator<Item = &str> {
        self.models.iter().map(|m| m.model.topic.as_str())
    }

    pub fn failure(&self, topic: &str) -> Option<&TopicFailure> {
        self.failures.iter().find(|f| f.topic == topic)
    }

    pub fn model(&self, topic: &str) -> Option<&TopicModel> {
        self.models
            .iter()
            .map(|m| &m.model)
            .find(|m| m.topic == topic)
    }
}

/// Column headers: `time, entity`, then `{topic}_Risk, {topic}_Intervention`
/// per trained topic
pub fn csv_headers(report: &RiskReport) -> Vec<String> {
    let mut headers = vec!["time".to_string(), "entity".to_string()];
    for topic in report.trained_topics() {
        headers.push(format!("{}_Risk", topic));
        headers.push(format!("{}_Intervention", topic));
    }
    headers
}

/// Write the per-row risk and intervention columns as CSV
pub fn write_csv<W: Write>(report: &RiskReport, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(csv_headers(report))?;

    for row in &report.rows {
        let mut record = Vec::with_capacity(2 + row.cells.len() * 2);
        record.push(row.time.to_string());
        record.push(row.entity.clone());
        for cell in &row.cells {
            record.push(cell.plan.recommendation.risk_flag().to_string());
            record.push(cell.plan.text.clone());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
