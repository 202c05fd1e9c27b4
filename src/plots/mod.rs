//! Plot Views
//!
//! Each view is a fixed projection of the processed table into a
//! [`PlotSpec`]: panels, series of `(x, y)` points and optional text
//! annotations. Projection never touches the filesystem; [`render`] turns a
//! spec into an SVG figure when an output directory is requested.
//!
//! # Views
//!
//! ```text
//! View                     Panels          Series         x            y
//! ─────────────────────────────────────────────────────────────────────────────
//! speedup-vs-chunk-size    1               per dataset    Chunk Size   Speedup
//! speedup-vs-core-count    1               per dataset    Core Count   Speedup
//! speedup-by-strategy      1 (bars)        per dataset    Strategy     Speedup
//! speedup-by-dataset       per dataset     per chunk      Core Count   Speedup          (+ best chunk)
//! runtime-by-dataset       per dataset     per chunk      Core Count   Mean Exec. Time  (+ best chunk)
//! efficiency-by-dataset    per dataset     per chunk      Core Count   Efficiency
//! speedup-by-strategy-facet per strategy   per chunk      Core Count   Speedup
//! ```
//!
//! Filter values (strategy, core count, chunk size) come from
//! [`ViewConfig`](crate::config::ViewConfig). Series with no matching rows
//! are left out, and points within a series are sorted by x.

pub mod render;

pub use render::render_svg;

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::records::{ProcessedRecord, RunParameters};
use crate::selection::Selection;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// A named projection of the processed table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlotView {
    SpeedupVsChunkSize,
    SpeedupVsCoreCount,
    SpeedupByStrategy,
    SpeedupByDataset,
    RuntimeByDataset,
    EfficiencyByDataset,
    SpeedupByStrategyFacet,
}

impl PlotView {
    /// Every view, in report order.
    pub fn all() -> [PlotView; 7] {
        [
            PlotView::SpeedupVsChunkSize,
            PlotView::SpeedupVsCoreCount,
            PlotView::SpeedupByStrategy,
            PlotView::SpeedupByDataset,
            PlotView::RuntimeByDataset,
            PlotView::EfficiencyByDataset,
            PlotView::SpeedupByStrategyFacet,
        ]
    }

    /// Command-line name, also used as the SVG file stem.
    pub fn name(&self) -> &'static str {
        match self {
            PlotView::SpeedupVsChunkSize => "speedup-vs-chunk-size",
            PlotView::SpeedupVsCoreCount => "speedup-vs-core-count",
            PlotView::SpeedupByStrategy => "speedup-by-strategy",
            PlotView::SpeedupByDataset => "speedup-by-dataset",
            PlotView::RuntimeByDataset => "runtime-by-dataset",
            PlotView::EfficiencyByDataset => "efficiency-by-dataset",
            PlotView::SpeedupByStrategyFacet => "speedup-by-strategy-facet",
        }
    }

    /// Figure title.
    pub fn title(&self) -> &'static str {
        match self {
            PlotView::SpeedupVsChunkSize => "Speedup vs Chunk Size",
            PlotView::SpeedupVsCoreCount => "Speedup vs Core Count",
            PlotView::SpeedupByStrategy => "Speedup vs Scheduling Strategy",
            PlotView::SpeedupByDataset => "Parallel vs Sequential Speedup across Core Count",
            PlotView::RuntimeByDataset => "Mean Execution Time across Core Count",
            PlotView::EfficiencyByDataset => "Efficiency across Core Count",
            PlotView::SpeedupByStrategyFacet => "Speedup per Scheduling Strategy",
        }
    }

    /// Project the processed table into this view.
    pub fn project(&self, records: &[ProcessedRecord], config: &AnalysisConfig) -> PlotSpec {
        let views = &config.views;
        let panels = match self {
            PlotView::SpeedupVsChunkSize => vec![per_dataset_panel(
                records,
                config,
                &views.chunk_view_strategy,
                Fixed::CoreCount(views.chunk_view_core_count),
                XAxis::ChunkSize,
            )],
            PlotView::SpeedupVsCoreCount => vec![per_dataset_panel(
                records,
                config,
                &views.core_view_strategy,
                Fixed::ChunkSize(views.core_view_chunk_size),
                XAxis::CoreCount,
            )],
            PlotView::SpeedupByStrategy => vec![strategy_bars(records, config)],
            PlotView::SpeedupByDataset => {
                chunk_panels_per_dataset(records, config, &views.dataset_view_strategy, Metric::Speedup)
            }
            PlotView::RuntimeByDataset => chunk_panels_per_dataset(
                records,
                config,
                &views.dataset_view_strategy,
                Metric::MeanExecutionTime,
            ),
            PlotView::EfficiencyByDataset => chunk_panels_per_dataset(
                records,
                config,
                &views.efficiency_view_strategy,
                Metric::Efficiency,
            ),
            PlotView::SpeedupByStrategyFacet => strategy_facets(records, config),
        };

        PlotSpec {
            view: *self,
            title: self.title().to_string(),
            panels,
        }
    }
}

impl fmt::Display for PlotView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotView {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        PlotView::all()
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = PlotView::all().iter().map(|v| v.name()).collect();
                AnalysisError::Config(format!(
                    "unknown plot view '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// How a panel is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    Line,
    /// Grouped bars; x values index into [`Panel::categories`]
    Bar,
}

/// One labelled sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Text placed at a data coordinate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

/// One subplot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    /// Bar labels, empty for line panels
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub annotations: Vec<Annotation>,
}

impl Panel {
    fn line(title: impl Into<String>, x: XAxis, metric: Metric) -> Self {
        Self {
            title: title.into(),
            kind: ChartKind::Line,
            x_label: x.label().to_string(),
            y_label: metric.label().to_string(),
            categories: Vec::new(),
            series: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// True when no series has a point.
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.points.is_empty())
    }

    /// Every plotted point, annotations included.
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.series
            .iter()
            .flat_map(|s| s.points.iter().copied())
            .chain(self.annotations.iter().map(|a| (a.x, a.y)))
    }
}

/// A complete figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSpec {
    pub view: PlotView,
    pub title: String,
    pub panels: Vec<Panel>,
}

impl PlotSpec {
    pub fn is_empty(&self) -> bool {
        self.panels.iter().all(Panel::is_empty)
    }
}

/// Per-row quantity plotted on the y axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Metric {
    Speedup,
    MeanExecutionTime,
    Efficiency,
}

impl Metric {
    pub fn value(&self, record: &ProcessedRecord) -> f64 {
        match self {
            Metric::Speedup => record.speedup,
            Metric::MeanExecutionTime => record.run.mean_execution_time,
            Metric::Efficiency => record.efficiency,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Speedup => "Speedup",
            Metric::MeanExecutionTime => "Mean Execution Time",
            Metric::Efficiency => "Efficiency",
        }
    }

    /// Which end of the scale is better.
    pub fn objective(&self) -> Objective {
        match self {
            Metric::MeanExecutionTime => Objective::Min,
            Metric::Speedup | Metric::Efficiency => Objective::Max,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Objective {
    Max,
    Min,
}

impl Objective {
    fn improves(&self, candidate: f64, current: f64) -> bool {
        match self {
            Objective::Max => candidate > current,
            Objective::Min => candidate < current,
        }
    }
}

/// Best chunk size for one core count.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BestChunk {
    pub core_count: u32,
    pub chunk_size: u32,
    pub value: f64,
}

/// For every core count present, the chunk size whose `metric` is best.
///
/// Ties keep the row that appears first. Output is ordered by core count.
pub fn best_chunk_sizes(
    records: &[ProcessedRecord],
    metric: Metric,
    objective: Objective,
) -> Vec<BestChunk> {
    let mut best: BTreeMap<u32, BestChunk> = BTreeMap::new();
    for record in records {
        let (Some(core_count), Some(chunk_size)) = (record.core_count(), record.chunk_size()) else {
            continue;
        };
        let value = metric.value(record);
        best.entry(core_count)
            .and_modify(|b| {
                if objective.improves(value, b.value) {
                    b.chunk_size = chunk_size;
                    b.value = value;
                }
            })
            .or_insert(BestChunk {
                core_count,
                chunk_size,
                value,
            });
    }
    best.into_values().collect()
}

#[derive(Debug, Clone, Copy)]
enum XAxis {
    ChunkSize,
    CoreCount,
}

impl XAxis {
    fn value(&self, record: &ProcessedRecord) -> Option<f64> {
        match self {
            XAxis::ChunkSize => record.chunk_size().map(f64::from),
            XAxis::CoreCount => record.core_count().map(f64::from),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            XAxis::ChunkSize => "Chunk Size",
            XAxis::CoreCount => "Core Count",
        }
    }
}

/// Parameter held constant across a single-panel view.
#[derive(Debug, Clone, Copy)]
enum Fixed {
    CoreCount(u32),
    ChunkSize(u32),
}

fn series(label: String, rows: &[ProcessedRecord], x: XAxis, metric: Metric) -> Series {
    let mut points: Vec<(f64, f64)> = rows
        .iter()
        .filter_map(|r| Some((x.value(r)?, metric.value(r))))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    Series { label, points }
}

fn push_non_empty(panel: &mut Panel, series: Series) {
    if !series.points.is_empty() {
        panel.series.push(series);
    }
}

/// One series per dataset bound, with one strategy and one fixed parameter.
fn per_dataset_panel(
    records: &[ProcessedRecord],
    config: &AnalysisConfig,
    strategy: &str,
    fixed: Fixed,
    x: XAxis,
) -> Panel {
    let title = match fixed {
        Fixed::CoreCount(c) => format!("{strategy}, Core Count = {c}"),
        Fixed::ChunkSize(c) => format!("{strategy}, Chunk Size = {c}"),
    };
    let mut panel = Panel::line(title, x, Metric::Speedup);
    let base = Selection::for_variant(&config.baseline_gcd_version).scheduling_strategy(strategy);
    let base = match fixed {
        Fixed::CoreCount(c) => base.core_count(c),
        Fixed::ChunkSize(c) => base.chunk_size(c),
    };

    for &upper in &config.parameters.dataset_bounds {
        let rows = base.clone().upper(upper).apply(records);
        let label = config.parameters.dataset_label(upper);
        push_non_empty(&mut panel, series(label, &rows, x, Metric::Speedup));
    }
    panel
}

/// Grouped bars: one category per strategy, one bar series per dataset.
fn strategy_bars(records: &[ProcessedRecord], config: &AnalysisConfig) -> Panel {
    let views = &config.views;
    let strategies = &config.parameters.scheduling_strategies;
    let mut panel = Panel {
        title: format!(
            "Chunk Size = {}, Core Count = {}",
            views.strategy_view_chunk_size, views.strategy_view_core_count
        ),
        kind: ChartKind::Bar,
        x_label: "Scheduling Strategy".to_string(),
        y_label: Metric::Speedup.label().to_string(),
        categories: strategies.clone(),
        series: Vec::new(),
        annotations: Vec::new(),
    };

    let base = Selection::for_variant(&config.baseline_gcd_version)
        .chunk_size(views.strategy_view_chunk_size)
        .core_count(views.strategy_view_core_count);
    for &upper in &config.parameters.dataset_bounds {
        let rows = base.clone().upper(upper).apply(records);
        let points: Vec<(f64, f64)> = strategies
            .iter()
            .enumerate()
            .filter_map(|(idx, strategy)| {
                rows.iter()
                    .find(|r| r.scheduling_strategy() == Some(strategy.as_str()))
                    .map(|r| (idx as f64, r.speedup))
            })
            .collect();
        push_non_empty(
            &mut panel,
            Series {
                label: config.parameters.dataset_label(upper),
                points,
            },
        );
    }
    panel
}

/// Series per configured chunk size over core count, for one filtered slice.
fn chunk_series_panel(
    title: String,
    rows: &[ProcessedRecord],
    config: &AnalysisConfig,
    metric: Metric,
) -> Panel {
    let mut panel = Panel::line(title, XAxis::CoreCount, metric);
    for &chunk in &config.parameters.chunk_sizes {
        let subset: Vec<ProcessedRecord> = rows
            .iter()
            .filter(|r| r.chunk_size() == Some(chunk))
            .cloned()
            .collect();
        let label = format!("Chunk size = {chunk}");
        push_non_empty(&mut panel, series(label, &subset, XAxis::CoreCount, metric));
    }
    panel
}

fn chunk_panels_per_dataset(
    records: &[ProcessedRecord],
    config: &AnalysisConfig,
    strategy: &str,
    metric: Metric,
) -> Vec<Panel> {
    let annotate = metric != Metric::Efficiency;
    config
        .parameters
        .dataset_bounds
        .iter()
        .map(|&upper| {
            let rows = Selection::for_variant(&config.baseline_gcd_version)
                .upper(upper)
                .scheduling_strategy(strategy)
                .apply(records);
            let mut panel =
                chunk_series_panel(config.parameters.dataset_label(upper), &rows, config, metric);
            if annotate {
                panel.annotations = best_chunk_sizes(&rows, metric, metric.objective())
                    .into_iter()
                    .map(|b| Annotation {
                        x: f64::from(b.core_count),
                        y: b.value,
                        text: b.chunk_size.to_string(),
                    })
                    .collect();
            }
            panel
        })
        .collect()
}

fn strategy_facets(records: &[ProcessedRecord], config: &AnalysisConfig) -> Vec<Panel> {
    let Some(upper) = config.strategy_facet_upper() else {
        return Vec::new();
    };
    config
        .parameters
        .scheduling_strategies
        .iter()
        .map(|strategy| {
            let rows = Selection::for_variant(&config.baseline_gcd_version)
                .upper(upper)
                .scheduling_strategy(strategy.as_str())
                .apply(records);
            chunk_series_panel(
                format!("Scheduling Strategy: {strategy}"),
                &rows,
                config,
                Metric::Speedup,
            )
        })
        .collect()
}
