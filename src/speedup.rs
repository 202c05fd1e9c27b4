//! Speedup and efficiency against the sequential baseline.
//!
//! The baseline is an explicit map from dataset bound to the mean sequential
//! execution time of the baseline GCD variant. Building the map fails when a
//! bound has more than one distinct mean; looking a bound up fails when it
//! has none. Parallel rows are then joined by `Upper`:
//!
//! ```text
//! Speedup    = baseline[Upper] / Mean Execution Time
//! Efficiency = Speedup / Core Count
//! ```

use crate::aggregation::aggregate_runs;
use crate::config::ParameterSpace;
use crate::error::{AnalysisError, Result};
use crate::records::{AggregatedRecord, BenchmarkTable, ProcessedRecord, RunParameters};
use crate::schema::Family;
use std::collections::BTreeMap;

/// Sequential mean execution time per dataset bound.
#[derive(Debug, Clone, PartialEq)]
pub struct BaselineMap {
    gcd_version: String,
    baselines: BTreeMap<u64, f64>,
}

impl BaselineMap {
    /// Build from sequential aggregates of a single GCD variant.
    ///
    /// Repeated identical means for a bound count once.
    pub fn from_aggregated(gcd_version: &str, records: &[AggregatedRecord]) -> Result<Self> {
        let mut candidates: BTreeMap<u64, Vec<f64>> = BTreeMap::new();
        for record in records {
            let Some(upper) = record.upper() else {
                continue;
            };
            let means = candidates.entry(upper).or_default();
            if !means.contains(&record.mean_execution_time) {
                means.push(record.mean_execution_time);
            }
        }

        let mut baselines = BTreeMap::new();
        for (upper, values) in candidates {
            if values.len() > 1 {
                return Err(AnalysisError::DuplicateBaseline { upper, values });
            }
            let mean = values[0];
            if !(mean.is_finite() && mean > 0.0) {
                return Err(AnalysisError::InvalidMeasurement {
                    upper,
                    core_count: None,
                    reason: format!("sequential mean execution time {mean} is not positive"),
                });
            }
            baselines.insert(upper, mean);
        }

        Ok(Self {
            gcd_version: gcd_version.to_string(),
            baselines,
        })
    }

    /// Restrict the raw sequential table to `gcd_version`, aggregate, and build.
    pub fn from_sequential(sequential: &BenchmarkTable, gcd_version: &str) -> Result<Self> {
        let variant = sequential.with_gcd_version(gcd_version);
        if variant.is_empty() {
            log::warn!("No sequential {gcd_version} runs found; every baseline lookup will fail");
        }
        let aggregated = aggregate_runs(&variant.records);
        Self::from_aggregated(gcd_version, &aggregated.records)
    }

    /// Baseline for one bound.
    pub fn get(&self, upper: u64) -> Result<f64> {
        self.baselines
            .get(&upper)
            .copied()
            .ok_or(AnalysisError::MissingBaseline { upper })
    }

    /// GCD variant the baseline was measured with.
    pub fn gcd_version(&self) -> &str {
        &self.gcd_version
    }

    /// Check that every bound in `bounds` has a baseline.
    pub fn require(&self, bounds: &[u64]) -> Result<()> {
        bounds.iter().try_for_each(|&upper| self.get(upper).map(|_| ()))
    }

    pub fn len(&self) -> usize {
        self.baselines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baselines.is_empty()
    }

    /// `(Upper, baseline)` pairs, smallest bound first.
    pub fn iter(&self) -> impl Iterator<Item = (u64, f64)> + '_ {
        self.baselines.iter().map(|(k, v)| (*k, *v))
    }
}

/// Why a parallel aggregate was left out of the processed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// `Upper` is not a configured dataset bound
    UnknownBound,
    /// Benchmarked with a GCD variant other than the baseline's
    OtherVariant,
}

/// Output of the baseline join.
#[derive(Debug, Clone, Default)]
pub struct SpeedupReport {
    pub records: Vec<ProcessedRecord>,
    pub excluded: Vec<(AggregatedRecord, Exclusion)>,
}

impl SpeedupReport {
    /// Number of rows excluded for `reason`.
    pub fn excluded_count(&self, reason: Exclusion) -> usize {
        self.excluded.iter().filter(|(_, r)| *r == reason).count()
    }
}

/// Join parallel aggregates against the baseline.
///
/// Every parallel row of the baseline variant whose `Upper` is a configured
/// bound gets one speedup and one efficiency value. Rows with other bounds or
/// other variants are returned in [`SpeedupReport::excluded`].
pub fn compute_speedup(
    parallel: &[AggregatedRecord],
    baselines: &BaselineMap,
    parameters: &ParameterSpace,
) -> Result<SpeedupReport> {
    if parallel.is_empty() {
        return Err(AnalysisError::EmptyTable {
            family: Family::Parallel,
        });
    }

    let mut report = SpeedupReport::default();
    for row in parallel {
        if row.gcd_version() != Some(baselines.gcd_version()) {
            report.excluded.push((row.clone(), Exclusion::OtherVariant));
            continue;
        }
        let upper = match row.upper() {
            Some(upper) if parameters.is_known_bound(upper) => upper,
            _ => {
                report.excluded.push((row.clone(), Exclusion::UnknownBound));
                continue;
            }
        };

        let baseline = baselines.get(upper)?;
        let speedup = ratio_to_baseline(baseline, row)?;
        let efficiency = per_core(speedup, row)?;
        report.records.push(ProcessedRecord {
            run: row.clone(),
            speedup,
            efficiency,
        });
    }

    let unknown = report.excluded_count(Exclusion::UnknownBound);
    if unknown > 0 {
        log::warn!("{unknown} parallel configurations have an unknown dataset bound and were excluded");
    }
    let other = report.excluded_count(Exclusion::OtherVariant);
    if other > 0 {
        log::info!(
            "{other} parallel configurations use a GCD variant other than {} and were excluded",
            baselines.gcd_version()
        );
    }
    log::info!("Computed speedup for {} configurations", report.records.len());

    Ok(report)
}

fn ratio_to_baseline(baseline: f64, row: &AggregatedRecord) -> Result<f64> {
    let mean = row.mean_execution_time;
    if !(mean.is_finite() && mean > 0.0) {
        return Err(AnalysisError::InvalidMeasurement {
            upper: row.upper().unwrap_or_default(),
            core_count: row.core_count(),
            reason: format!("parallel mean execution time {mean} is not positive"),
        });
    }
    Ok(baseline / mean)
}

fn per_core(speedup: f64, row: &AggregatedRecord) -> Result<f64> {
    match row.core_count() {
        Some(cores) if cores > 0 => Ok(speedup / f64::from(cores)),
        other => Err(AnalysisError::InvalidMeasurement {
            upper: row.upper().unwrap_or_default(),
            core_count: other,
            reason: "core count must be positive".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::RunKey;

    fn aggregate(upper: u64, cores: Option<u32>, mean: f64) -> AggregatedRecord {
        AggregatedRecord {
            key: RunKey {
                upper: Some(upper),
                core_count: cores,
                gcd_version: Some("Euclid".to_string()),
                scheduling_strategy: cores.map(|_| "dynamic".to_string()),
                chunk_size: cores.map(|_| 10),
                ..RunKey::default()
            },
            mean_execution_time: mean,
            runs: 1,
        }
    }

    fn baselines(pairs: &[(u64, f64)]) -> BaselineMap {
        let seq: Vec<_> = pairs.iter().map(|&(u, m)| aggregate(u, None, m)).collect();
        BaselineMap::from_aggregated("Euclid", &seq).unwrap()
    }

    #[test]
    fn test_speedup_and_efficiency() {
        let map = baselines(&[(15000, 10.0)]);
        let report = compute_speedup(
            &[aggregate(15000, Some(4), 2.5)],
            &map,
            &ParameterSpace::default(),
        )
        .unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].speedup, 4.0);
        assert_eq!(report.records[0].efficiency, 1.0);
    }

    #[test]
    fn test_baseline_keyed_by_bound_not_position() {
        // Built in descending order; lookups must still match by value
        let map = baselines(&[(100000, 90.0), (30000, 30.0), (15000, 10.0)]);
        assert_eq!(map.get(15000).unwrap(), 10.0);
        assert_eq!(map.get(100000).unwrap(), 90.0);

        let report = compute_speedup(
            &[aggregate(30000, Some(2), 15.0), aggregate(100000, Some(2), 45.0)],
            &map,
            &ParameterSpace::default(),
        )
        .unwrap();
        assert!(report.records.iter().all(|r| r.speedup == 2.0));
    }

    #[test]
    fn test_duplicate_baseline_rejected() {
        let seq = vec![aggregate(15000, None, 10.0), aggregate(15000, None, 12.0)];
        match BaselineMap::from_aggregated("Euclid", &seq).unwrap_err() {
            AnalysisError::DuplicateBaseline { upper, values } => {
                assert_eq!(upper, 15000);
                assert_eq!(values, vec![10.0, 12.0]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_identical_duplicate_means_count_once() {
        let seq = vec![aggregate(15000, None, 10.0), aggregate(15000, None, 10.0)];
        let map = BaselineMap::from_aggregated("Euclid", &seq).unwrap();
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_missing_baseline_is_fatal() {
        let map = baselines(&[(15000, 10.0)]);
        let err = compute_speedup(
            &[aggregate(30000, Some(2), 1.0)],
            &map,
            &ParameterSpace::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingBaseline { upper: 30000 }));
        assert!(map.require(&[15000, 30000]).is_err());
        assert!(map.require(&[15000]).is_ok());
    }

    #[test]
    fn test_empty_baseline_is_missing_baseline() {
        let map = BaselineMap::from_aggregated("Euclid", &[]).unwrap();
        assert!(map.is_empty());
        let err = compute_speedup(
            &[aggregate(15000, Some(2), 1.0)],
            &map,
            &ParameterSpace::default(),
        )
        .unwrap_err();
        assert!(matches!(err, AnalysisError::MissingBaseline { .. }));
    }

    #[test]
    fn test_empty_parallel_table_is_error() {
        let map = baselines(&[(15000, 10.0)]);
        assert!(matches!(
            compute_speedup(&[], &map, &ParameterSpace::default()).unwrap_err(),
            AnalysisError::EmptyTable {
                family: Family::Parallel
            }
        ));
    }

    #[test]
    fn test_unknown_bound_and_other_variant_excluded() {
        let map = baselines(&[(15000, 10.0)]);
        let mut binary = aggregate(15000, Some(2), 1.0);
        binary.key.gcd_version = Some("Binary".to_string());

        let report = compute_speedup(
            &[
                aggregate(15000, Some(2), 5.0),
                aggregate(12345, Some(2), 5.0),
                binary,
            ],
            &map,
            &ParameterSpace::default(),
        )
        .unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.excluded_count(Exclusion::UnknownBound), 1);
        assert_eq!(report.excluded_count(Exclusion::OtherVariant), 1);
    }

    #[test]
    fn test_zero_parallel_time_rejected() {
        let map = baselines(&[(15000, 10.0)]);
        assert!(matches!(
            compute_speedup(
                &[aggregate(15000, Some(2), 0.0)],
                &map,
                &ParameterSpace::default()
            )
            .unwrap_err(),
            AnalysisError::InvalidMeasurement { .. }
        ));
    }
}
