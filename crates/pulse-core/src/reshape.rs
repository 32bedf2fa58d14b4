//! Long-to-wide reshaping of indicator records
//!
//! Repeated (time, entity, topic) observations are averaged, topics become
//! columns, and absent cells are filled with 0.0 so the matrix is dense.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{IndicatorRecord, RowKey, TopicRegistry, WideRow, WideTable};

/// Running sum/count for one (time, entity, topic) cell
#[derive(Debug, Default, Clone, Copy)]
struct CellMean {
    sum: f64,
    count: usize,
}

impl CellMean {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Pivot long-format records into a dense wide table
///
/// Rows come out ordered by (time, entity); the registry keeps topics in
/// first-seen order. Non-finite values are skipped. Empty input yields an
/// empty table.
pub fn reshape(records: &[IndicatorRecord]) -> WideTable {
    let mut registry = TopicRegistry::new();
    let mut cells: BTreeMap<RowKey, Vec<CellMean>> = BTreeMap::new();

    for record in records {
        if !record.value.is_finite() {
            debug!(topic = %record.topic, entity = %record.entity, "Skipping non-finite value");
            continue;
        }
        let topic = registry.intern(&record.topic);
        let key = RowKey {
            time: record.time,
            entity: record.entity.clone(),
        };
        let row = cells.entry(key).or_default();
        if row.len() <= topic.index() {
            row.resize(topic.index() + 1, CellMean::default());
        }
        row[topic.index()].add(record.value);
    }

    let width = registry.len();
    let rows: Vec<WideRow> = cells
        .into_iter()
        .map(|(key, mut row)| {
            row.resize(width, CellMean::default());
            WideRow {
                key,
                values: row.iter().map(CellMean::mean).collect(),
            }
        })
        .collect();

    debug!(rows = rows.len(), topics = width, "Reshaped indicator records");

    WideTable { registry, rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(time: i32, entity: &str, topic: &str, value: f64) -> IndicatorRecord {
        IndicatorRecord::new(time, entity, topic, value)
    }

    #[test]
    fn test_reshape_empty() {
        let table = reshape(&[]);
        assert!(table.is_empty());
        assert!(table.registry.is_empty());
    }

    #[test]
    fn test_reshape_dense_and_zero_filled() {
        let records = vec![
            rec(2020, "CA", "Asthma", 10.0),
            rec(2020, "TX", "Diabetes", 8.0),
            rec(2021, "CA", "Cancer", 3.0),
        ];
        let table = reshape(&records);

        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.registry.names(), &["Asthma", "Diabetes", "Cancer"]);
        for row in &table.rows {
            assert_eq!(row.values.len(), 3);
        }

        let ca_2020 = &table.rows[0];
        assert_eq!(ca_2020.key.entity, "CA");
        assert_eq!(ca_2020.values, vec![10.0, 0.0, 0.0]);
        let tx_2020 = &table.rows[1];
        assert_eq!(tx_2020.key.entity, "TX");
        assert_eq!(tx_2020.values, vec![0.0, 8.0, 0.0]);
    }

    #[test]
    fn test_reshape_averages_duplicates() {
        let records = vec![
            rec(2020, "CA", "Asthma", 10.0),
            rec(2020, "CA", "Asthma", 20.0),
            rec(2020, "CA", "Asthma", 30.0),
        ];
        let table = reshape(&records);

        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].values, vec![20.0]);
    }

    #[test]
    fn test_reshape_rows_sorted_by_time_then_entity() {
        let records = vec![
            rec(2021, "AL", "Asthma", 1.0),
            rec(2020, "WY", "Asthma", 2.0),
            rec(2020, "AK", "Asthma", 3.0),
        ];
        let table = reshape(&records);
        let keys: Vec<(i32, &str)> = table
            .rows
            .iter()
            .map(|r| (r.key.time, r.key.entity.as_str()))
            .collect();
        assert_eq!(keys, vec![(2020, "AK"), (2020, "WY"), (2021, "AL")]);
    }

    #[test]
    fn test_reshape_skips_nan() {
        let records = vec![rec(2020, "CA", "Asthma", f64::NAN), rec(2020, "CA", "Diabetes", 5.0)];
        let table = reshape(&records);
        assert_eq!(table.registry.names(), &["Diabetes"]);
        assert!(table.rows[0].values.iter().all(|v| v.is_finite()));
    }
}
