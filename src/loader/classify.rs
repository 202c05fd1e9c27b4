//! Benchmark filename classification.
//!
//! | Pattern | Family |
//! |---------|--------|
//! | `seq_benchmark_ds<N>_gcd<M>.<ext>` | Sequential |
//! | `para_benchmark_ds<N>.<ext>` | Parallel |
//!
//! The patterns are anchored at both ends so no name can match both.

use crate::error::{AnalysisError, Result};
use crate::schema::Family;
use regex::Regex;

/// Identity of a recognized benchmark file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileClass {
    pub family: Family,
    /// Dataset number `<N>`
    pub dataset: u32,
    /// GCD variant number `<M>` (sequential files only)
    pub gcd: Option<u32>,
}

/// Matches file names against the two family patterns.
#[derive(Debug, Clone)]
pub struct FileClassifier {
    extension: String,
    sequential: Regex,
    parallel: Regex,
}

impl FileClassifier {
    /// Build a classifier for files ending in `.<extension>`.
    pub fn new(extension: &str) -> Result<Self> {
        let ext = regex::escape(extension.trim_start_matches('.'));
        let sequential = Regex::new(&format!(r"^seq_benchmark_ds(\d+)_gcd(\d+)\.{ext}$"))
            .map_err(|e| AnalysisError::Config(e.to_string()))?;
        let parallel = Regex::new(&format!(r"^para_benchmark_ds(\d+)\.{ext}$"))
            .map_err(|e| AnalysisError::Config(e.to_string()))?;
        Ok(Self {
            extension: extension.trim_start_matches('.').to_string(),
            sequential,
            parallel,
        })
    }

    /// Whether the name carries the benchmark extension at all.
    pub fn has_extension(&self, file_name: &str) -> bool {
        file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext == self.extension)
            .unwrap_or(false)
    }

    /// Classify a bare file name; `None` when it matches neither pattern.
    pub fn classify(&self, file_name: &str) -> Option<FileClass> {
        if let Some(caps) = self.sequential.captures(file_name) {
            return Some(FileClass {
                family: Family::Sequential,
                dataset: caps[1].parse().ok()?,
                gcd: Some(caps[2].parse().ok()?),
            });
        }
        if let Some(caps) = self.parallel.captures(file_name) {
            return Some(FileClass {
                family: Family::Parallel,
                dataset: caps[1].parse().ok()?,
                gcd: None,
            });
        }
        None
    }
}
