//! Processed Data Validation
//!
//! Quality checks over the joined table, run after speedup computation so
//! that suspicious measurements are reported next to the results instead of
//! silently shaping the plots.
//!
//! # Checks
//!
//! 1. **Finite metrics**: speedup and efficiency must be finite (error)
//! 2. **Superlinear efficiency**: efficiency above 1.0 (warning)
//! 3. **Repetitions**: configurations measured fewer than `min_runs` times (warning)
//! 4. **Coverage**: swept combinations with no measurement (warning)
//!
//! # Usage
//!
//! ```ignore
//! let result = validate_processed(&report.records, &config);
//! if !result.is_valid() {
//!     for warning in result.warnings() {
//!         println!("Warning: {}", warning);
//!     }
//! }
//! ```

use crate::config::{AnalysisConfig, ParameterSpace};
use crate::records::{ProcessedRecord, RunParameters};
use std::collections::HashSet;
use std::fmt;

/// Validation result for a single check.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    /// Data is valid
    Valid,
    /// Data has minor issues (warnings)
    Warning(String),
    /// Data has serious issues (errors)
    Error(String),
}

impl ValidationLevel {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationLevel::Valid)
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, ValidationLevel::Warning(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ValidationLevel::Error(_))
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationLevel::Valid => write!(f, "Valid"),
            ValidationLevel::Warning(msg) => write!(f, "Warning: {msg}"),
            ValidationLevel::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// Aggregated validation result.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    results: Vec<(String, ValidationLevel)>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validation result.
    pub fn add(&mut self, check_name: &str, level: ValidationLevel) {
        self.results.push((check_name.to_string(), level));
    }

    /// Check if all validations passed (no errors or warnings).
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, level)| level.is_valid())
    }

    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_error())
    }

    pub fn has_warnings(&self) -> bool {
        self.results.iter().any(|(_, level)| level.is_warning())
    }

    /// Warning messages prefixed with their check name.
    pub fn warnings(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| match level {
                ValidationLevel::Warning(msg) => Some(format!("{name}: {msg}")),
                _ => None,
            })
            .collect()
    }

    /// Error messages prefixed with their check name.
    pub fn errors(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|(name, level)| match level {
                ValidationLevel::Error(msg) => Some(format!("{name}: {msg}")),
                _ => None,
            })
            .collect()
    }

    pub fn all_results(&self) -> &[(String, ValidationLevel)] {
        &self.results
    }

    pub fn check_count(&self) -> usize {
        self.results.len()
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|(_, l)| l.is_valid()).count()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let passed = self.passed_count();
        let total = self.check_count();
        writeln!(f, "Validation: {passed}/{total} checks passed")?;

        for (name, level) in &self.results {
            if !level.is_valid() {
                writeln!(f, "  - {name}: {level}")?;
            }
        }

        Ok(())
    }
}

/// Run every check over the processed table.
pub fn validate_processed(records: &[ProcessedRecord], config: &AnalysisConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    result.add("finite_metrics", check_finite(records));
    result.add("superlinear_efficiency", check_efficiency(records));
    result.add("repetitions", check_repetitions(records, config.min_runs));
    result.add("coverage", check_coverage(records, &config.parameters));
    result
}

fn check_finite(records: &[ProcessedRecord]) -> ValidationLevel {
    let bad = records
        .iter()
        .filter(|r| !r.speedup.is_finite() || !r.efficiency.is_finite())
        .count();
    if bad == 0 {
        ValidationLevel::Valid
    } else {
        ValidationLevel::Error(format!("{bad} configurations have non-finite speedup"))
    }
}

fn check_efficiency(records: &[ProcessedRecord]) -> ValidationLevel {
    let superlinear: Vec<&ProcessedRecord> =
        records.iter().filter(|r| r.efficiency > 1.0).collect();
    match superlinear.iter().max_by(|a, b| a.efficiency.total_cmp(&b.efficiency)) {
        None => ValidationLevel::Valid,
        Some(worst) => ValidationLevel::Warning(format!(
            "{} configurations exceed efficiency 1.0 (max {:.3} at Upper={}, Core Count={})",
            superlinear.len(),
            worst.efficiency,
            worst.upper().unwrap_or_default(),
            worst.core_count().unwrap_or_default()
        )),
    }
}

fn check_repetitions(records: &[ProcessedRecord], min_runs: usize) -> ValidationLevel {
    let few = records.iter().filter(|r| r.run.runs < min_runs).count();
    if few == 0 {
        ValidationLevel::Valid
    } else {
        ValidationLevel::Warning(format!(
            "{few} configurations have fewer than {min_runs} runs"
        ))
    }
}

/// Combinations of the parameter grid, restricted to the dataset bounds
/// actually present, that have no processed row.
fn check_coverage(records: &[ProcessedRecord], parameters: &ParameterSpace) -> ValidationLevel {
    let present: HashSet<(u64, u32, &str, u32)> = records
        .iter()
        .filter_map(|r| {
            Some((
                r.upper()?,
                r.core_count()?,
                r.scheduling_strategy()?,
                r.chunk_size()?,
            ))
        })
        .collect();
    let bounds: HashSet<u64> = present.iter().map(|k| k.0).collect();

    let mut missing = 0;
    for &upper in parameters.dataset_bounds.iter().filter(|b| bounds.contains(b)) {
        for &cores in &parameters.core_counts {
            for strategy in &parameters.scheduling_strategies {
                for &chunk in &parameters.chunk_sizes {
                    if !present.contains(&(upper, cores, strategy.as_str(), chunk)) {
                        missing += 1;
                    }
                }
            }
        }
    }

    if missing == 0 {
        ValidationLevel::Valid
    } else {
        ValidationLevel::Warning(format!(
            "{missing} swept combinations have no measurement"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AggregatedRecord, RunKey};

    fn processed(cores: u32, strategy: &str, chunk: u32, speedup: f64, runs: usize) -> ProcessedRecord {
        ProcessedRecord {
            run: AggregatedRecord {
                key: RunKey {
                    upper: Some(15000),
                    core_count: Some(cores),
                    gcd_version: Some("Euclid".to_string()),
                    scheduling_strategy: Some(strategy.to_string()),
                    chunk_size: Some(chunk),
                    ..RunKey::default()
                },
                mean_execution_time: 1.0,
                runs,
            },
            speedup,
            efficiency: speedup / f64::from(cores),
        }
    }

    fn small_config() -> AnalysisConfig {
        AnalysisConfig::default().with_parameters(ParameterSpace {
            dataset_bounds: vec![15000, 30000],
            core_counts: vec![2, 4],
            scheduling_strategies: vec!["static".to_string()],
            chunk_sizes: vec![10],
        })
    }

    #[test]
    fn test_clean_data_is_valid() {
        let records = vec![
            processed(2, "static", 10, 1.8, 3),
            processed(4, "static", 10, 3.5, 5),
        ];
        let result = validate_processed(&records, &small_config());
        assert!(result.is_valid(), "{result}");
        assert_eq!(result.passed_count(), 4);
    }

    #[test]
    fn test_superlinear_warning() {
        let records = vec![
            processed(2, "static", 10, 2.5, 3),
            processed(4, "static", 10, 3.0, 3),
        ];
        let result = validate_processed(&records, &small_config());
        assert!(result.has_warnings());
        assert!(!result.has_errors());
        assert!(result.warnings()[0].contains("superlinear_efficiency"));
    }

    #[test]
    fn test_non_finite_is_error() {
        let records = vec![processed(2, "static", 10, f64::INFINITY, 3)];
        let result = validate_processed(&records, &small_config());
        assert!(result.has_errors());
        assert_eq!(result.errors().len(), 1);
    }

    #[test]
    fn test_repetitions_and_coverage() {
        let records = vec![processed(2, "static", 10, 1.5, 1)];
        let result = validate_processed(&records, &small_config());
        let warnings = result.warnings();
        assert!(warnings.iter().any(|w| w.starts_with("repetitions")));
        // Core count 4 missing for the one bound present
        assert!(warnings
            .iter()
            .any(|w| w.starts_with("coverage") && w.contains("1 swept")));
    }

    #[test]
    fn test_validation_result_display() {
        let mut result = ValidationResult::new();
        result.add("test1", ValidationLevel::Valid);
        result.add("test2", ValidationLevel::Warning("minor issue".to_string()));
        result.add("test3", ValidationLevel::Error("major issue".to_string()));

        let display = format!("{result}");
        assert!(display.contains("1/3"));
        assert!(display.contains("minor issue"));
    }
}
