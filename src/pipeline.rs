//! Unified Analysis Pipeline
//!
//! Connects the stages in their only valid order and keeps every
//! intermediate table, so that callers can report on any of them.
//!
//! # Architecture
//!
//! ```text
//! Benchmarks/ ─► BenchmarkLoader ─┬─► sequential ─► BaselineMap (baseline variant, mean per Upper)
//!                                 │                        │
//!                                 └─► parallel ─► aggregate_runs ─► compute_speedup ─► processed
//!                                        │                                                │
//!                                        └─► SummaryTable                 validate_processed, PlotView
//! ```
//!
//! Each stage returns a new table; nothing is modified in place and nothing
//! is written to disk unless [`AnalysisOutput::render_plots`] is called.
//!
//! # Example
//!
//! ```ignore
//! use gcd_bench_analysis::prelude::*;
//!
//! let pipeline = Pipeline::from_config(AnalysisConfig::default())?;
//! let output = pipeline.run()?;
//!
//! println!("{}", output.summary_table());
//! output.render_plots("figures", &PlotView::all())?;
//! ```
//!
//! # Output Structure
//!
//! | Field | Type | Description |
//! |-------|------|-------------|
//! | `loaded` | `LoadedBenchmarks` | Raw tables, parsed and skipped files |
//! | `aggregated` | `AggregatedTable` | Parallel mean execution time per configuration |
//! | `baselines` | `BaselineMap` | Sequential mean per dataset bound |
//! | `report` | `SpeedupReport` | Processed rows and excluded aggregates |
//! | `validation` | `ValidationResult` | Quality checks on the processed rows |

use crate::aggregation::{aggregate_runs, AggregatedTable};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::loader::{BenchmarkLoader, LoadedBenchmarks};
use crate::plots::{render_svg, PlotSpec, PlotView};
use crate::records::ProcessedRecord;
use crate::schema::Family;
use crate::selection::Selection;
use crate::speedup::{compute_speedup, BaselineMap, SpeedupReport};
use crate::summary::SummaryTable;
use crate::validation::{validate_processed, ValidationResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Everything a pipeline run produced.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub loaded: LoadedBenchmarks,
    pub aggregated: AggregatedTable,
    pub baselines: BaselineMap,
    pub report: SpeedupReport,
    pub validation: ValidationResult,
    config: AnalysisConfig,
}

impl AnalysisOutput {
    /// Parallel configurations with speedup and efficiency.
    pub fn processed(&self) -> &[ProcessedRecord] {
        &self.report.records
    }

    /// Processed rows matching `selection`.
    pub fn select(&self, selection: &Selection) -> Vec<ProcessedRecord> {
        selection.apply(self.processed())
    }

    /// Summary statistics of the raw parallel runs.
    pub fn summary_table(&self) -> SummaryTable {
        self.summary_table_for(Family::Parallel)
    }

    /// Summary statistics of the raw runs of one family.
    pub fn summary_table_for(&self, family: Family) -> SummaryTable {
        SummaryTable::build(&self.loaded.table(family).records)
    }

    /// Project the processed table into one view.
    pub fn plot(&self, view: PlotView) -> PlotSpec {
        view.project(self.processed(), &self.config)
    }

    /// Render `views` as `<dir>/<view-name>.svg`, creating `dir` if needed.
    ///
    /// Views with no data are skipped. Returns the files written.
    pub fn render_plots<P: AsRef<Path>>(&self, dir: P, views: &[PlotView]) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| AnalysisError::io(dir, e))?;

        let mut written = Vec::with_capacity(views.len());
        for &view in views {
            let spec = self.plot(view);
            if spec.is_empty() {
                log::warn!("No data for plot view {view}, skipping");
                continue;
            }
            let path = dir.join(format!("{}.svg", view.name()));
            render_svg(&spec, &path, &self.config.plot)?;
            log::info!("Wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Configuration the run used.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}

/// Benchmark analysis pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: AnalysisConfig,
    loader: BenchmarkLoader,
}

impl Pipeline {
    /// Validate `config` and build the loader.
    pub fn from_config(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let loader = BenchmarkLoader::new(&config)?;
        Ok(Self { config, loader })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Load the configured benchmarks directory and process it.
    pub fn run(&self) -> Result<AnalysisOutput> {
        self.run_dir(&self.config.benchmarks_dir)
    }

    /// Load `dir` instead of the configured directory and process it.
    pub fn run_dir<P: AsRef<Path>>(&self, dir: P) -> Result<AnalysisOutput> {
        let loaded = self.loader.load_dir(dir)?;
        self.process(loaded)
    }

    /// Run every stage after loading.
    pub fn process(&self, loaded: LoadedBenchmarks) -> Result<AnalysisOutput> {
        let baselines =
            BaselineMap::from_sequential(&loaded.sequential, &self.config.baseline_gcd_version)?;
        log::info!(
            "Sequential {} baselines for {} dataset bounds",
            baselines.gcd_version(),
            baselines.len()
        );

        let aggregated = aggregate_runs(&loaded.parallel.records);
        let report = compute_speedup(&aggregated.records, &baselines, &self.config.parameters)?;

        let validation = validate_processed(&report.records, &self.config);
        for error in validation.errors() {
            log::error!("{error}");
        }
        for warning in validation.warnings() {
            log::warn!("{warning}");
        }

        Ok(AnalysisOutput {
            loaded,
            aggregated,
            baselines,
            report,
            validation,
            config: self.config.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{BenchmarkRecord, BenchmarkTable};

    fn run(cores: Option<u32>, time: f64) -> BenchmarkRecord {
        BenchmarkRecord {
            filename: None,
            lower: 1,
            upper: 15000,
            core_count: cores,
            gcd_version: Some("Euclid".to_string()),
            scheduling_strategy: cores.map(|_| "dynamic".to_string()),
            chunk_size: cores.map(|_| 10),
            execution_time: time,
        }
    }

    fn loaded(sequential: Vec<BenchmarkRecord>, parallel: Vec<BenchmarkRecord>) -> LoadedBenchmarks {
        LoadedBenchmarks {
            sequential: BenchmarkTable {
                family: Family::Sequential,
                records: sequential,
            },
            parallel: BenchmarkTable {
                family: Family::Parallel,
                records: parallel,
            },
            files: Vec::new(),
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_end_to_end_in_memory() {
        let pipeline = Pipeline::from_config(AnalysisConfig::default()).unwrap();
        let output = pipeline
            .process(loaded(
                vec![run(None, 10.0), run(None, 12.0)],
                vec![run(Some(2), 5.0), run(Some(2), 7.0)],
            ))
            .unwrap();

        assert_eq!(output.baselines.get(15000).unwrap(), 11.0);
        assert_eq!(output.aggregated.len(), 1);
        assert_eq!(output.aggregated.records[0].mean_execution_time, 6.0);

        let row = &output.processed()[0];
        assert!((row.speedup - 11.0 / 6.0).abs() < 1e-12);
        assert!((row.efficiency - 11.0 / 12.0).abs() < 1e-12);
        assert_eq!(output.summary_table().len(), 1);
        assert_eq!(output.summary_table_for(Family::Sequential).rows[0].core_count, None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AnalysisConfig::default();
        config.parameters.dataset_bounds.clear();
        assert!(matches!(
            Pipeline::from_config(config).unwrap_err(),
            AnalysisError::Config(_)
        ));
    }

    #[test]
    fn test_missing_sequential_data_fails_join() {
        let pipeline = Pipeline::from_config(AnalysisConfig::default()).unwrap();
        let err = pipeline
            .process(loaded(Vec::new(), vec![run(Some(2), 5.0)]))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingBaseline { upper: 15000 }));
    }

    #[test]
    fn test_select_and_plot_from_output() {
        let pipeline = Pipeline::from_config(AnalysisConfig::default()).unwrap();
        let output = pipeline
            .process(loaded(
                vec![run(None, 10.0)],
                vec![run(Some(2), 5.0), run(Some(4), 2.5)],
            ))
            .unwrap();

        assert_eq!(output.select(&Selection::new().core_count(4)).len(), 1);
        let spec = output.plot(PlotView::SpeedupByDataset);
        assert_eq!(spec.panels[0].annotations.len(), 2);
    }
}
