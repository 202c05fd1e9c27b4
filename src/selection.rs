//! Row selection by benchmark parameters.
//!
//! A [`Selection`] always restricts to one GCD variant and then narrows by
//! exact equality on any of `Upper`, `Core Count`, `Scheduling Strategy` and
//! `Chunk Size`. Filters are independent, so applying two selections in
//! sequence gives the same rows as one selection carrying both sets of
//! filters.
//!
//! # Example
//!
//! ```ignore
//! use gcd_bench_analysis::selection::Selection;
//!
//! let ds2_8_cores = Selection::new()
//!     .upper(30000)
//!     .core_count(8)
//!     .apply(&processed);
//! ```

use crate::records::RunParameters;

/// Equality filters over a processed or aggregated table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    gcd_version: String,
    upper: Option<u64>,
    core_count: Option<u32>,
    scheduling_strategy: Option<String>,
    chunk_size: Option<u32>,
}

impl Default for Selection {
    fn default() -> Self {
        Self::for_variant("Euclid")
    }
}

impl Selection {
    /// Select every row of the default `Euclid` variant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every row of `gcd_version`.
    pub fn for_variant(gcd_version: impl Into<String>) -> Self {
        Self {
            gcd_version: gcd_version.into(),
            upper: None,
            core_count: None,
            scheduling_strategy: None,
            chunk_size: None,
        }
    }

    pub fn upper(mut self, upper: u64) -> Self {
        self.upper = Some(upper);
        self
    }

    pub fn core_count(mut self, core_count: u32) -> Self {
        self.core_count = Some(core_count);
        self
    }

    pub fn scheduling_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.scheduling_strategy = Some(strategy.into());
        self
    }

    pub fn chunk_size(mut self, chunk_size: u32) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    /// Whether a single row passes every filter.
    pub fn matches<R: RunParameters>(&self, row: &R) -> bool {
        row.gcd_version() == Some(self.gcd_version.as_str())
            && self.upper.map_or(true, |v| row.upper() == Some(v))
            && self.core_count.map_or(true, |v| row.core_count() == Some(v))
            && self
                .scheduling_strategy
                .as_deref()
                .map_or(true, |v| row.scheduling_strategy() == Some(v))
            && self.chunk_size.map_or(true, |v| row.chunk_size() == Some(v))
    }

    /// Matching rows, in input order. The input is not modified.
    pub fn apply<R: RunParameters + Clone>(&self, rows: &[R]) -> Vec<R> {
        rows.iter().filter(|r| self.matches(*r)).cloned().collect()
    }
}
