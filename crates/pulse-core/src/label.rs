//! Median-split risk labels

use crate::models::{TopicId, WideTable};

/// Binary labels for one topic, aligned with the wide table's rows
#[derive(Debug, Clone, PartialEq)]
pub struct TopicLabels {
    pub topic: TopicId,
    /// Median of the topic's values
    pub threshold: f64,
    pub labels: Vec<bool>,
}

impl TopicLabels {
    pub fn positives(&self) -> usize {
        self.labels.iter().filter(|&&l| l).count()
    }

    /// Whether both classes occur at least once
    pub fn has_both_classes(&self) -> bool {
        let positives = self.positives();
        positives > 0 && positives < self.labels.len()
    }
}

/// Label every row of `table` as high risk (value strictly above the
/// topic median) or not
pub fn label_topic(table: &WideTable, topic: TopicId) -> TopicLabels {
    let values = table.column(topic);
    let threshold = median(&values);
    let labels = values.iter().map(|&v| v > threshold).collect();

    TopicLabels {
        topic,
        threshold,
        labels,
    }
}

/// Calculate median of a slice
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}
