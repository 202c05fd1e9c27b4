//! Column definitions for benchmark tables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named column of a benchmark table.
///
/// Header names match the CSV files written by the benchmark runner after
/// normalization (trimmed, quotes stripped).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Column {
    Filename,
    Lower,
    Upper,
    CoreCount,
    GcdVersion,
    SchedulingStrategy,
    ChunkSize,
    ExecutionTime,
    /// Derived by aggregation
    MeanExecutionTime,
    /// Derived by the baseline join
    Speedup,
    /// Derived from speedup and core count
    Efficiency,
}

impl Column {
    /// Columns present in raw CSV files.
    pub const RAW: [Column; 8] = [
        Column::Filename,
        Column::Lower,
        Column::Upper,
        Column::CoreCount,
        Column::GcdVersion,
        Column::SchedulingStrategy,
        Column::ChunkSize,
        Column::ExecutionTime,
    ];

    /// The identifying tuple of a benchmark configuration.
    pub const RUN_KEY: [Column; 7] = [
        Column::Filename,
        Column::Lower,
        Column::Upper,
        Column::CoreCount,
        Column::GcdVersion,
        Column::SchedulingStrategy,
        Column::ChunkSize,
    ];

    /// Header name as it appears in CSV files and rendered tables.
    pub fn name(self) -> &'static str {
        match self {
            Column::Filename => "Filename",
            Column::Lower => "Lower",
            Column::Upper => "Upper",
            Column::CoreCount => "Core Count",
            Column::GcdVersion => "GCD Version",
            Column::SchedulingStrategy => "Scheduling Strategy",
            Column::ChunkSize => "Chunk Size",
            Column::ExecutionTime => "Execution Time",
            Column::MeanExecutionTime => "Mean Execution Time",
            Column::Speedup => "Speedup",
            Column::Efficiency => "Efficiency",
        }
    }

    /// Look up a raw column by its normalized header.
    pub fn from_header(header: &str) -> Option<Column> {
        Column::RAW.into_iter().find(|c| c.name() == header)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
