//! Error types for benchmark analysis.

use crate::schema::Family;
use std::path::PathBuf;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Errors that can occur while loading, joining or rendering benchmark data.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV reader failure (malformed file)
    #[error("CSV error in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Required columns absent after header normalization
    #[error("{path}: {family} file is missing required columns: {}", .missing.join(", "))]
    MissingColumns {
        path: PathBuf,
        family: Family,
        missing: Vec<String>,
    },

    /// A cell that could not be parsed into its column type
    #[error("{path}: row {row}, column '{column}': invalid value '{value}'")]
    InvalidValue {
        path: PathBuf,
        row: usize,
        column: String,
        value: String,
    },

    /// A family table with no rows where rows are required
    #[error("no {family} benchmark records available")]
    EmptyTable { family: Family },

    /// No sequential baseline for a dataset bound used by parallel rows
    #[error("missing sequential baseline for Upper={upper}")]
    MissingBaseline { upper: u64 },

    /// More than one sequential mean for the same dataset bound
    #[error("ambiguous sequential baseline for Upper={upper}: {} candidate means {values:?}", .values.len())]
    DuplicateBaseline { upper: u64, values: Vec<f64> },

    /// A measurement that cannot take part in a ratio
    #[error("invalid measurement for Upper={upper}, Core Count={core_count:?}: {reason}")]
    InvalidMeasurement {
        upper: u64,
        core_count: Option<u32>,
        reason: String,
    },

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Config (de)serialization failure
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Plot rendering failure
    #[error("render error: {0}")]
    Render(String),
}

impl AnalysisError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AnalysisError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        AnalysisError::Csv {
            path: path.into(),
            source,
        }
    }

    /// True for failures caused by the benchmark inputs rather than the environment.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::MissingColumns { .. }
                | AnalysisError::InvalidValue { .. }
                | AnalysisError::EmptyTable { .. }
                | AnalysisError::MissingBaseline { .. }
                | AnalysisError::DuplicateBaseline { .. }
                | AnalysisError::InvalidMeasurement { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_names_all_columns() {
        let err = AnalysisError::MissingColumns {
            path: PathBuf::from("para_benchmark_ds1.csv"),
            family: Family::Parallel,
            missing: vec!["Core Count".to_string(), "Chunk Size".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Core Count, Chunk Size"));
        assert!(msg.contains("parallel"));
        assert!(err.is_data_error());
    }

    #[test]
    fn test_baseline_errors_identify_bound() {
        let err = AnalysisError::MissingBaseline { upper: 30000 };
        assert!(err.to_string().contains("30000"));

        let err = AnalysisError::DuplicateBaseline {
            upper: 15000,
            values: vec![1.0, 2.0],
        };
        assert!(err.to_string().contains("15000"));
        assert!(err.to_string().contains("2 candidate"));
    }

    #[test]
    fn test_config_error_is_not_data_error() {
        assert!(!AnalysisError::Config("bad".to_string()).is_data_error());
    }
}
