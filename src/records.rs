//! Benchmark record types.
//!
//! Raw rows are loaded into [`BenchmarkRecord`]s. Aggregation collapses them
//! into [`AggregatedRecord`]s keyed by a [`RunKey`], and the baseline join
//! extends parallel aggregates into [`ProcessedRecord`]s. Each stage builds a
//! new table; earlier tables are never modified.

use crate::schema::{Column, Family};
use serde::Serialize;

/// One measured run, as read from a CSV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkRecord {
    pub filename: Option<String>,
    pub lower: u64,
    pub upper: u64,
    /// Missing or fixed at 1 for sequential runs
    pub core_count: Option<u32>,
    pub gcd_version: Option<String>,
    /// Parallel runs only
    pub scheduling_strategy: Option<String>,
    /// Parallel runs only
    pub chunk_size: Option<u32>,
    /// Seconds
    pub execution_time: f64,
}

impl BenchmarkRecord {
    /// Key of this run projected onto `columns`.
    pub fn key(&self, columns: &[Column]) -> RunKey {
        RunKey::project(self, columns)
    }
}

/// Identifying parameters of a benchmark configuration.
///
/// Fields not selected by the grouping columns are `None`, so two runs share
/// a key exactly when they agree on every grouping column. The derived
/// ordering gives aggregated tables a deterministic row order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RunKey {
    pub filename: Option<String>,
    pub lower: Option<u64>,
    pub upper: Option<u64>,
    pub core_count: Option<u32>,
    pub gcd_version: Option<String>,
    pub scheduling_strategy: Option<String>,
    pub chunk_size: Option<u32>,
}

impl RunKey {
    /// Keep only the fields named in `columns`.
    ///
    /// Non-key columns (execution time, derived metrics) are ignored.
    pub fn project(record: &BenchmarkRecord, columns: &[Column]) -> Self {
        let mut key = RunKey::default();
        for column in columns {
            match column {
                Column::Filename => key.filename = record.filename.clone(),
                Column::Lower => key.lower = Some(record.lower),
                Column::Upper => key.upper = Some(record.upper),
                Column::CoreCount => key.core_count = record.core_count,
                Column::GcdVersion => key.gcd_version = record.gcd_version.clone(),
                Column::SchedulingStrategy => {
                    key.scheduling_strategy = record.scheduling_strategy.clone()
                }
                Column::ChunkSize => key.chunk_size = record.chunk_size,
                _ => {}
            }
        }
        key
    }

    /// Value of a key column as display text.
    pub fn cell(&self, column: Column) -> Option<String> {
        match column {
            Column::Filename => self.filename.clone(),
            Column::Lower => self.lower.map(|v| v.to_string()),
            Column::Upper => self.upper.map(|v| v.to_string()),
            Column::CoreCount => self.core_count.map(|v| v.to_string()),
            Column::GcdVersion => self.gcd_version.clone(),
            Column::SchedulingStrategy => self.scheduling_strategy.clone(),
            Column::ChunkSize => self.chunk_size.map(|v| v.to_string()),
            _ => None,
        }
    }
}

/// Mean execution time of every run sharing one key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedRecord {
    pub key: RunKey,
    /// Arithmetic mean of the contributing `Execution Time`s
    pub mean_execution_time: f64,
    /// Number of raw runs that contributed
    pub runs: usize,
}

/// A parallel aggregate joined against its sequential baseline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedRecord {
    pub run: AggregatedRecord,
    /// Baseline mean / this mean
    pub speedup: f64,
    /// Speedup / core count
    pub efficiency: f64,
}

/// Access to the parameters of a table row, shared by every stage's output.
pub trait RunParameters {
    fn run_key(&self) -> &RunKey;

    fn upper(&self) -> Option<u64> {
        self.run_key().upper
    }

    fn core_count(&self) -> Option<u32> {
        self.run_key().core_count
    }

    fn gcd_version(&self) -> Option<&str> {
        self.run_key().gcd_version.as_deref()
    }

    fn scheduling_strategy(&self) -> Option<&str> {
        self.run_key().scheduling_strategy.as_deref()
    }

    fn chunk_size(&self) -> Option<u32> {
        self.run_key().chunk_size
    }
}

impl RunParameters for AggregatedRecord {
    fn run_key(&self) -> &RunKey {
        &self.key
    }
}

impl RunParameters for ProcessedRecord {
    fn run_key(&self) -> &RunKey {
        &self.run.key
    }
}

/// All raw records of one family, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkTable {
    pub family: Family,
    pub records: Vec<BenchmarkRecord>,
}

impl BenchmarkTable {
    pub fn new(family: Family) -> Self {
        Self {
            family,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows benchmarked with the given GCD variant.
    pub fn with_gcd_version(&self, version: &str) -> BenchmarkTable {
        BenchmarkTable {
            family: self.family,
            records: self
                .records
                .iter()
                .filter(|r| r.gcd_version.as_deref() == Some(version))
                .cloned()
                .collect(),
        }
    }

    /// Append another table's rows after this one's.
    pub fn extend(&mut self, other: BenchmarkTable) {
        self.records.extend(other.records);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> BenchmarkRecord {
        BenchmarkRecord {
            filename: Some("para_benchmark_ds1.csv".to_string()),
            lower: 1,
            upper: 15000,
            core_count: Some(4),
            gcd_version: Some("Euclid".to_string()),
            scheduling_strategy: Some("dynamic".to_string()),
            chunk_size: Some(10),
            execution_time: 1.5,
        }
    }

    #[test]
    fn test_projection_keeps_only_requested_columns() {
        let key = record().key(&[Column::Upper, Column::CoreCount]);
        assert_eq!(key.upper, Some(15000));
        assert_eq!(key.core_count, Some(4));
        assert_eq!(key.filename, None);
        assert_eq!(key.scheduling_strategy, None);
    }

    #[test]
    fn test_key_cells_render_as_text() {
        let key = record().key(&Column::RUN_KEY);
        assert_eq!(key.cell(Column::CoreCount).as_deref(), Some("4"));
        assert_eq!(key.cell(Column::SchedulingStrategy).as_deref(), Some("dynamic"));
        assert_eq!(key.cell(Column::ExecutionTime), None);
    }

    #[test]
    fn test_with_gcd_version_filters_rows() {
        let mut table = BenchmarkTable::new(Family::Sequential);
        table.records.push(record());
        let mut binary = record();
        binary.gcd_version = Some("Binary".to_string());
        table.records.push(binary);

        let euclid = table.with_gcd_version("Euclid");
        assert_eq!(euclid.len(), 1);
        assert_eq!(table.len(), 2);
    }
}
