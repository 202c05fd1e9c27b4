//! Run aggregation.
//!
//! Collapses repeated runs into one mean execution time per distinct
//! combination of the grouping columns.

use crate::records::{AggregatedRecord, BenchmarkRecord, RunKey};
use crate::schema::Column;
use std::collections::BTreeMap;

/// Aggregated rows together with the grouping columns that produced them.
///
/// `columns` keeps the caller's order; it is the column order used when the
/// table is displayed.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedTable {
    pub columns: Vec<Column>,
    pub records: Vec<AggregatedRecord>,
}

impl AggregatedTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Header row: grouping columns followed by the mean.
    pub fn header(&self) -> Vec<&'static str> {
        self.columns
            .iter()
            .map(|c| c.name())
            .chain(std::iter::once(Column::MeanExecutionTime.name()))
            .collect()
    }

    /// Display cells of each row, aligned with [`header`](Self::header).
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|r| {
                self.columns
                    .iter()
                    .map(|&c| r.key.cell(c).unwrap_or_default())
                    .chain(std::iter::once(r.mean_execution_time.to_string()))
                    .collect()
            })
            .collect()
    }
}

#[derive(Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Mean `Execution Time` per distinct value of `columns`.
///
/// Rows are keyed on the projection of each record onto `columns`, so two
/// rows that both lack a grouping value fall into the same group. A group
/// with one row passes that row's time through unchanged.
pub fn mean_execution_time(records: &[BenchmarkRecord], columns: &[Column]) -> AggregatedTable {
    let mut groups: BTreeMap<RunKey, Accumulator> = BTreeMap::new();
    for record in records {
        let acc = groups.entry(record.key(columns)).or_default();
        acc.sum += record.execution_time;
        acc.count += 1;
    }

    let records: Vec<AggregatedRecord> = groups
        .into_iter()
        .map(|(key, acc)| AggregatedRecord {
            key,
            mean_execution_time: if acc.count == 1 {
                acc.sum
            } else {
                acc.sum / acc.count as f64
            },
            runs: acc.count,
        })
        .collect();

    log::debug!(
        "Aggregated {} runs into {} configurations",
        records.iter().map(|r| r.runs).sum::<usize>(),
        records.len()
    );

    AggregatedTable {
        columns: columns.to_vec(),
        records,
    }
}

/// Aggregate on the full identifying tuple.
pub fn aggregate_runs(records: &[BenchmarkRecord]) -> AggregatedTable {
    mean_execution_time(records, &Column::RUN_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(upper: u64, cores: u32, chunk: u32, time: f64) -> BenchmarkRecord {
        BenchmarkRecord {
            filename: Some("ds".to_string()),
            lower: 1,
            upper,
            core_count: Some(cores),
            gcd_version: Some("Euclid".to_string()),
            scheduling_strategy: Some("static".to_string()),
            chunk_size: Some(chunk),
            execution_time: time,
        }
    }

    #[test]
    fn test_three_runs_collapse_to_mean() {
        let records = vec![
            run(15000, 2, 10, 2.0),
            run(15000, 2, 10, 4.0),
            run(15000, 2, 10, 6.0),
        ];
        let table = aggregate_runs(&records);
        assert_eq!(table.len(), 1);
        assert_eq!(table.records[0].mean_execution_time, 4.0);
        assert_eq!(table.records[0].runs, 3);
    }

    #[test]
    fn test_single_run_passes_through() {
        let records = vec![run(15000, 2, 10, 0.1 + 0.2)];
        let table = aggregate_runs(&records);
        assert_eq!(table.records[0].mean_execution_time, 0.1 + 0.2);
    }

    #[test]
    fn test_one_row_per_distinct_key() {
        let records = vec![
            run(15000, 2, 10, 1.0),
            run(15000, 4, 10, 1.0),
            run(30000, 2, 10, 1.0),
            run(15000, 2, 20, 1.0),
            run(15000, 2, 10, 3.0),
        ];
        let table = aggregate_runs(&records);
        assert_eq!(table.len(), 4);
        assert_eq!(table.records.iter().map(|r| r.runs).sum::<usize>(), 5);
    }

    #[test]
    fn test_coarser_grouping_merges_rows() {
        let records = vec![
            run(15000, 2, 10, 1.0),
            run(15000, 4, 20, 3.0),
            run(30000, 2, 10, 5.0),
        ];
        let table = mean_execution_time(&records, &[Column::Upper]);
        assert_eq!(table.len(), 2);
        let ds1 = table
            .records
            .iter()
            .find(|r| r.key.upper == Some(15000))
            .unwrap();
        assert_eq!(ds1.mean_execution_time, 2.0);
        assert_eq!(ds1.key.core_count, None);
        assert_eq!(table.rows()[0], vec!["15000".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_header_follows_grouping_order() {
        let table = mean_execution_time(&[], &[Column::ChunkSize, Column::Upper]);
        assert!(table.is_empty());
        assert_eq!(
            table.header(),
            vec!["Chunk Size", "Upper", "Mean Execution Time"]
        );
    }
}
