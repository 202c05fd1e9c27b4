//! Benchmark Table Schema
//!
//! Column names, benchmark families and the required-column sets checked
//! once at load time, so that a malformed file fails with a message naming
//! what is missing instead of a lookup failure deep in the pipeline.
//!
//! # Example
//!
//! ```ignore
//! use gcd_bench_analysis::schema::{Family, HeaderMap};
//!
//! let headers = vec!["Lower".to_string(), "Upper".to_string()];
//! let err = HeaderMap::resolve("seq.csv", Family::Sequential, &headers).unwrap_err();
//! ```

mod column;

pub use column::Column;

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// The two kinds of benchmark file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// `seq_benchmark_ds<N>_gcd<M>` files, the baseline runs
    Sequential,
    /// `para_benchmark_ds<N>` files
    Parallel,
}

impl Family {
    /// Columns a file of this family must carry.
    pub fn required_columns(self) -> &'static [Column] {
        match self {
            Family::Sequential => &[
                Column::Lower,
                Column::Upper,
                Column::GcdVersion,
                Column::ExecutionTime,
            ],
            Family::Parallel => &[
                Column::Lower,
                Column::Upper,
                Column::CoreCount,
                Column::SchedulingStrategy,
                Column::ChunkSize,
                Column::ExecutionTime,
            ],
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Family::Sequential => f.write_str("sequential"),
            Family::Parallel => f.write_str("parallel"),
        }
    }
}

/// Position of each known column within one file's header row.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    positions: BTreeMap<Column, usize>,
}

impl HeaderMap {
    /// Map normalized headers to columns and check the family's required set.
    ///
    /// Unknown headers are ignored. When a header repeats, the first
    /// occurrence wins.
    pub fn resolve(path: impl AsRef<Path>, family: Family, headers: &[String]) -> Result<Self> {
        let mut positions = BTreeMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if let Some(column) = Column::from_header(header) {
                positions.entry(column).or_insert(idx);
            }
        }

        let missing: Vec<String> = family
            .required_columns()
            .iter()
            .filter(|c| !positions.contains_key(*c))
            .map(|c| c.name().to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AnalysisError::MissingColumns {
                path: path.as_ref().to_path_buf(),
                family,
                missing,
            });
        }

        Ok(Self { positions })
    }

    /// Index of `column` in the row, if the file has it.
    pub fn position(&self, column: Column) -> Option<usize> {
        self.positions.get(&column).copied()
    }

    /// Whether the file carries `column`.
    pub fn contains(&self, column: Column) -> bool {
        self.positions.contains_key(&column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_column_round_trip_by_header() {
        for column in Column::RAW {
            assert_eq!(Column::from_header(column.name()), Some(column));
        }
        assert_eq!(Column::from_header("Speedup"), None);
    }

    #[test]
    fn test_resolve_parallel_headers() {
        let h = headers(&[
            "Filename",
            "Lower",
            "Upper",
            "Core Count",
            "Scheduling Strategy",
            "Chunk Size",
            "Execution Time",
            "Result",
        ]);
        let map = HeaderMap::resolve("p.csv", Family::Parallel, &h).unwrap();
        assert_eq!(map.position(Column::CoreCount), Some(3));
        assert!(!map.contains(Column::GcdVersion));
    }

    #[test]
    fn test_resolve_reports_every_missing_column() {
        let h = headers(&["Lower", "Upper", "Execution Time"]);
        let err = HeaderMap::resolve("p.csv", Family::Parallel, &h).unwrap_err();
        match err {
            AnalysisError::MissingColumns { missing, family, .. } => {
                assert_eq!(family, Family::Parallel);
                assert_eq!(
                    missing,
                    vec!["Core Count", "Scheduling Strategy", "Chunk Size"]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sequential_requires_gcd_version() {
        let h = headers(&["Lower", "Upper", "Execution Time"]);
        assert!(HeaderMap::resolve("s.csv", Family::Sequential, &h).is_err());
    }
}
