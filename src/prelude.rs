//! Prelude module for convenient imports.
//!
//! # Usage
//!
//! ```ignore
//! use gcd_bench_analysis::prelude::*;
//!
//! let pipeline = Pipeline::from_config(AnalysisConfig::default())?;
//! let output = pipeline.run()?;
//! println!("{}", output.summary_table());
//! ```
//!
//! # What's Included
//!
//! - [`Pipeline`], [`AnalysisOutput`] - End-to-end processing
//! - [`AnalysisConfig`], [`ParameterSpace`] - Configuration
//! - [`Selection`], [`RunParameters`] - Filtering processed rows
//! - [`PlotView`], [`PlotSpec`] - Plot projections
//! - [`SummaryTable`] - Raw-run statistics
//! - [`ValidationResult`] - Quality checks

// ============================================================================
// Core Pipeline
// ============================================================================

pub use crate::config::{AnalysisConfig, ParameterSpace, PlotConfig, ViewConfig};
pub use crate::pipeline::{AnalysisOutput, Pipeline};

// ============================================================================
// Tables
// ============================================================================

pub use crate::aggregation::{aggregate_runs, mean_execution_time, AggregatedTable};
pub use crate::records::{
    AggregatedRecord, BenchmarkRecord, BenchmarkTable, ProcessedRecord, RunParameters,
};
pub use crate::schema::{Column, Family};
pub use crate::selection::Selection;
pub use crate::speedup::{compute_speedup, BaselineMap, SpeedupReport};
pub use crate::summary::SummaryTable;

// ============================================================================
// Plots
// ============================================================================

pub use crate::plots::{best_chunk_sizes, Metric, Objective, PlotSpec, PlotView};

// ============================================================================
// Validation and errors
// ============================================================================

pub use crate::error::{AnalysisError, Result};
pub use crate::validation::{ValidationLevel, ValidationResult};
