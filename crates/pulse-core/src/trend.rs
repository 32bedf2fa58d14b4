//! Mean indicator value per topic per year

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{IndicatorRecord, TopicRegistry};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendRow {
    pub time: i32,
    /// One entry per topic; `None` when the topic has no records that year
    pub means: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendTable {
    pub topics: Vec<String>,
    pub rows: Vec<TrendRow>,
}

impl TrendTable {
    /// The most recent `n` periods
    pub fn tail(&self, n: usize) -> &[TrendRow] {
        &self.rows[self.rows.len().saturating_sub(n)..]
    }
}

/// Average raw record values by (time, topic)
///
/// Means are taken over the long records, not the wide table, so zero-filled
/// cells do not pull averages down. Topic columns follow `registry` order.
pub fn topic_trends(records: &[IndicatorRecord], registry: &TopicRegistry) -> TrendTable {
    let width = registry.len();
    let mut sums: BTreeMap<i32, Vec<(f64, usize)>> = BTreeMap::new();

    for record in records {
        let Some(topic) = registry.id(&record.topic) else {
            continue;
        };
        if !record.value.is_finite() {
            continue;
        }
        let cells = sums
            .entry(record.time)
            .or_insert_with(|| vec![(0.0, 0); width]);
        cells[topic.index()].0 += record.value;
        cells[topic.index()].1 += 1;
    }

    let rows = sums
        .into_iter()
        .map(|(time, cells)| TrendRow {
            time,
            means: cells
                .into_iter()
                .map(|(sum, count)| (count > 0).then(|| sum / count as f64))
                .collect(),
        })
        .collect();

    TrendTable {
        topics: registry.names().to_vec(),
        rows,
    }
}
