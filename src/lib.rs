//! GCD Benchmark Analysis
//!
//! Speedup, efficiency and summary statistics for parallel GCD benchmark
//! sweeps.
//!
//! # Overview
//!
//! A sweep runs a GCD-sum program over a few datasets (identified by their
//! upper bound), sequentially with one or more GCD variants and in parallel
//! across core counts, loop scheduling strategies and chunk sizes. Every
//! configuration is repeated, and each run appends one row to a CSV file.
//! This library turns those files into:
//!
//! - one mean execution time per configuration
//! - speedup and efficiency against the sequential baseline
//! - a per `(Core Count, Upper)` summary table of the raw runs
//! - plot-ready projections of the processed table, optionally as SVG
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     GCD Benchmark Analysis                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  schema/      - Column names, families, required columns        │
//! │  loader/      - File classification, CSV parsing, cleaning      │
//! │  aggregation  - Mean execution time per configuration           │
//! │  speedup      - Baseline map and speedup/efficiency join        │
//! │  selection    - Parameter filters over processed rows           │
//! │  summary      - Raw-run statistics table                        │
//! │  plots/       - View projections and SVG rendering              │
//! │  validation   - Quality checks on processed rows                │
//! │  pipeline     - All of the above, in order                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use gcd_bench_analysis::prelude::*;
//!
//! let config = AnalysisConfig::default().with_benchmarks_dir("Benchmarks");
//! let output = Pipeline::from_config(config)?.run()?;
//!
//! for row in Selection::new().upper(30000).core_count(8).apply(output.processed()) {
//!     println!("{:?}: {:.3}", row.scheduling_strategy(), row.speedup);
//! }
//! ```

pub mod aggregation;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod plots;
pub mod records;
pub mod schema;
pub mod selection;
pub mod speedup;
pub mod summary;
pub mod validation;

pub mod prelude;

// Re-exports - Errors
pub use error::{AnalysisError, Result};

// Re-exports - Config
pub use config::{AnalysisConfig, ParameterSpace, PlotConfig, ViewConfig};

// Re-exports - Schema and records
pub use records::{
    AggregatedRecord, BenchmarkRecord, BenchmarkTable, ProcessedRecord, RunKey, RunParameters,
};
pub use schema::{Column, Family, HeaderMap};

// Re-exports - Stages
pub use aggregation::{aggregate_runs, mean_execution_time, AggregatedTable};
pub use loader::{BenchmarkLoader, FileClass, FileClassifier, LoadedBenchmarks};
pub use selection::Selection;
pub use speedup::{compute_speedup, BaselineMap, Exclusion, SpeedupReport};
pub use summary::{SummaryRow, SummaryTable, SUMMARY_HEADERS};

// Re-exports - Plots
pub use plots::{best_chunk_sizes, BestChunk, Metric, Objective, PlotSpec, PlotView};

// Re-exports - Pipeline and validation
pub use pipeline::{AnalysisOutput, Pipeline};
pub use validation::{validate_processed, ValidationLevel, ValidationResult};
