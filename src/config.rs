//! Analysis configuration management.
//!
//! One configuration structure carries every domain constant the pipeline
//! relies on (dataset bounds, core counts, scheduling strategies, chunk
//! sizes) together with the input location and the filter values used by
//! each plot view. It is passed explicitly to every stage.
//!
//! # Example
//!
//! ```ignore
//! use gcd_bench_analysis::config::AnalysisConfig;
//!
//! let config = AnalysisConfig::default().with_benchmarks_dir("results/");
//! config.save_toml("analysis.toml")?;
//!
//! let loaded = AnalysisConfig::load_toml("analysis.toml")?;
//! loaded.validate()?;
//! ```

use crate::error::{AnalysisError, Result};
use std::collections::HashSet;
use std::fs;
use std::hash::Hash;
use std::path::{Path, PathBuf};

/// Unified analysis configuration.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisConfig {
    /// Directory holding the benchmark CSV files
    pub benchmarks_dir: PathBuf,

    /// File extension (without dot) recognized as benchmark output
    pub extension: String,

    /// GCD variant whose sequential runs form the speedup baseline
    pub baseline_gcd_version: String,

    /// Minimum raw runs per configuration before validation warns
    #[serde(default = "default_min_runs")]
    pub min_runs: usize,

    /// Swept parameter values
    #[serde(default)]
    pub parameters: ParameterSpace,

    /// Fixed filters for each plot view
    #[serde(default)]
    pub views: ViewConfig,

    /// Figure settings
    #[serde(default)]
    pub plot: PlotConfig,
}

fn default_min_runs() -> usize {
    3
}

/// Parameter values of a benchmark sweep.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterSpace {
    /// Dataset upper bounds, smallest first (DS1, DS2, ...)
    pub dataset_bounds: Vec<u64>,

    /// Thread counts
    pub core_counts: Vec<u32>,

    /// Loop scheduling policies
    pub scheduling_strategies: Vec<String>,

    /// Work chunk sizes
    pub chunk_sizes: Vec<u32>,
}

/// Filter values used by the plot views.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewConfig {
    /// Speedup vs chunk size: strategy and core count
    pub chunk_view_strategy: String,
    pub chunk_view_core_count: u32,

    /// Speedup vs core count: strategy and chunk size
    pub core_view_strategy: String,
    pub core_view_chunk_size: u32,

    /// Speedup by strategy: chunk size and core count
    pub strategy_view_chunk_size: u32,
    pub strategy_view_core_count: u32,

    /// Strategy for the per-dataset speedup and runtime panels
    pub dataset_view_strategy: String,

    /// Strategy for the per-dataset efficiency panels
    pub efficiency_view_strategy: String,

    /// Dataset bound for the per-strategy panels; the largest bound when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_facet_upper: Option<u64>,
}

/// Figure settings.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PlotConfig {
    /// Width of a single panel in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            benchmarks_dir: PathBuf::from("Benchmarks"),
            extension: "csv".to_string(),
            baseline_gcd_version: "Euclid".to_string(),
            min_runs: default_min_runs(),
            parameters: ParameterSpace::default(),
            views: ViewConfig::default(),
            plot: PlotConfig::default(),
        }
    }
}

impl Default for ParameterSpace {
    /// The sweep analysed by the report: 3 datasets, 2-64 cores.
    fn default() -> Self {
        Self {
            dataset_bounds: vec![15000, 30000, 100000],
            core_counts: vec![2, 4, 8, 16, 32, 64],
            scheduling_strategies: vec![
                "static".to_string(),
                "dynamic".to_string(),
                "guided".to_string(),
            ],
            chunk_sizes: vec![1, 10, 20, 40, 60, 80, 100, 120, 140, 160],
        }
    }
}

impl ParameterSpace {
    /// The smaller grid swept by the process runner script.
    pub fn runner() -> Self {
        Self {
            dataset_bounds: vec![15000, 30000, 100000],
            core_counts: vec![1, 2, 4, 8],
            scheduling_strategies: vec![
                "static".to_string(),
                "dynamic".to_string(),
                "guided".to_string(),
                "auto".to_string(),
            ],
            chunk_sizes: vec![1, 10, 100, 1000],
        }
    }

    /// Short dataset label ("DS1", "DS2", ...) for a bound.
    pub fn dataset_label(&self, upper: u64) -> String {
        match self.dataset_bounds.iter().position(|&b| b == upper) {
            Some(idx) => format!("DS{}", idx + 1),
            None => format!("Upper={upper}"),
        }
    }

    /// Whether `upper` is one of the configured dataset bounds.
    pub fn is_known_bound(&self, upper: u64) -> bool {
        self.dataset_bounds.contains(&upper)
    }

    /// Largest configured dataset bound.
    pub fn largest_bound(&self) -> Option<u64> {
        self.dataset_bounds.iter().copied().max()
    }

    fn validate(&self) -> std::result::Result<(), String> {
        check_list("dataset_bounds", &self.dataset_bounds, |v| *v > 0)?;
        check_list("core_counts", &self.core_counts, |v| *v > 0)?;
        check_list("chunk_sizes", &self.chunk_sizes, |v| *v > 0)?;
        check_list("scheduling_strategies", &self.scheduling_strategies, |s| {
            !s.trim().is_empty()
        })?;
        Ok(())
    }
}

fn check_list<T, F>(name: &str, values: &[T], valid: F) -> std::result::Result<(), String>
where
    T: Eq + Hash + std::fmt::Debug,
    F: Fn(&T) -> bool,
{
    if values.is_empty() {
        return Err(format!("{name} must not be empty"));
    }
    if let Some(bad) = values.iter().find(|v| !valid(v)) {
        return Err(format!("{name} contains invalid value {bad:?}"));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = values.iter().find(|v| !seen.insert(*v)) {
        return Err(format!("{name} contains duplicate value {dup:?}"));
    }
    Ok(())
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            chunk_view_strategy: "dynamic".to_string(),
            chunk_view_core_count: 32,
            core_view_strategy: "dynamic".to_string(),
            core_view_chunk_size: 80,
            strategy_view_chunk_size: 10,
            strategy_view_core_count: 32,
            dataset_view_strategy: "dynamic".to_string(),
            efficiency_view_strategy: "guided".to_string(),
            strategy_facet_upper: None,
        }
    }
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 600,
        }
    }
}

impl AnalysisConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the benchmarks directory.
    pub fn with_benchmarks_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.benchmarks_dir = dir.into();
        self
    }

    /// Set the baseline GCD variant.
    pub fn with_baseline_gcd_version(mut self, version: impl Into<String>) -> Self {
        self.baseline_gcd_version = version.into();
        self
    }

    /// Set the parameter space.
    pub fn with_parameters(mut self, parameters: ParameterSpace) -> Self {
        self.parameters = parameters;
        self
    }

    /// Set the view filters.
    pub fn with_views(mut self, views: ViewConfig) -> Self {
        self.views = views;
        self
    }

    /// Dataset bound used by the per-strategy panels.
    pub fn strategy_facet_upper(&self) -> Option<u64> {
        self.views
            .strategy_facet_upper
            .or_else(|| self.parameters.largest_bound())
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.extension.trim().is_empty() {
            return Err(AnalysisError::Config("extension must not be empty".into()));
        }
        if self.baseline_gcd_version.trim().is_empty() {
            return Err(AnalysisError::Config(
                "baseline_gcd_version must not be empty".into(),
            ));
        }
        if self.plot.width == 0 || self.plot.height == 0 {
            return Err(AnalysisError::Config(format!(
                "plot dimensions must be positive, got {}x{}",
                self.plot.width, self.plot.height
            )));
        }
        self.parameters.validate().map_err(AnalysisError::Config)?;
        Ok(())
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = toml::to_string_pretty(self)
            .map_err(|e| AnalysisError::Serialization(e.to_string()))?;
        fs::write(path.as_ref(), text).map_err(|e| AnalysisError::io(path.as_ref(), e))
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text =
            fs::read_to_string(path.as_ref()).map_err(|e| AnalysisError::io(path.as_ref(), e))?;
        toml::from_str(&text).map_err(|e| AnalysisError::Serialization(e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::Serialization(e.to_string()))?;
        fs::write(path.as_ref(), text).map_err(|e| AnalysisError::io(path.as_ref(), e))
    }

    /// Load configuration from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text =
            fs::read_to_string(path.as_ref()).map_err(|e| AnalysisError::io(path.as_ref(), e))?;
        serde_json::from_str(&text).map_err(|e| AnalysisError::Serialization(e.to_string()))
    }

    /// Load from `.json` or `.toml` depending on the file extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        match path.as_ref().extension().and_then(|e| e.to_str()) {
            Some("json") => Self::load_json(path),
            _ => Self::load_toml(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.baseline_gcd_version, "Euclid");
        assert_eq!(config.parameters.dataset_bounds, vec![15000, 30000, 100000]);
    }

    #[test]
    fn test_runner_parameters_are_valid() {
        let config = AnalysisConfig::default().with_parameters(ParameterSpace::runner());
        assert!(config.validate().is_ok());
        assert!(config
            .parameters
            .scheduling_strategies
            .contains(&"auto".to_string()));
    }

    #[test]
    fn test_duplicate_bound_rejected() {
        let mut params = ParameterSpace::default();
        params.dataset_bounds.push(15000);
        let config = AnalysisConfig::default().with_parameters(params);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_and_zero_values_rejected() {
        let mut params = ParameterSpace::default();
        params.core_counts.clear();
        assert!(AnalysisConfig::default()
            .with_parameters(params)
            .validate()
            .is_err());

        let mut params = ParameterSpace::default();
        params.chunk_sizes.push(0);
        assert!(AnalysisConfig::default()
            .with_parameters(params)
            .validate()
            .is_err());
    }

    #[test]
    fn test_dataset_labels() {
        let params = ParameterSpace::default();
        assert_eq!(params.dataset_label(15000), "DS1");
        assert_eq!(params.dataset_label(100000), "DS3");
        assert_eq!(params.dataset_label(5), "Upper=5");
        assert_eq!(params.largest_bound(), Some(100000));
    }

    #[test]
    fn test_strategy_facet_defaults_to_largest_bound() {
        let mut config = AnalysisConfig::default();
        assert_eq!(config.strategy_facet_upper(), Some(100000));
        config.views.strategy_facet_upper = Some(30000);
        assert_eq!(config.strategy_facet_upper(), Some(30000));
    }

    #[test]
    fn test_toml_and_json_files() {
        let dir = TempDir::new().unwrap();
        let config = AnalysisConfig::default()
            .with_benchmarks_dir("results")
            .with_baseline_gcd_version("Binary");

        let toml_path = dir.path().join("analysis.toml");
        config.save_toml(&toml_path).unwrap();
        assert_eq!(AnalysisConfig::from_file(&toml_path).unwrap(), config);

        let json_path = dir.path().join("analysis.json");
        config.save_json(&json_path).unwrap();
        assert_eq!(AnalysisConfig::from_file(&json_path).unwrap(), config);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let text = r#"
benchmarks_dir = "data"
extension = "csv"
baseline_gcd_version = "Euclid"
"#;
        let config: AnalysisConfig = toml::from_str(text).unwrap();
        assert_eq!(config.parameters, ParameterSpace::default());
        assert_eq!(config.min_runs, 3);
    }
}
