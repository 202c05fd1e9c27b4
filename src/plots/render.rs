//! SVG rendering of plot specs.
//!
//! Panels are laid out side by side, each `PlotConfig::width` pixels wide.

use super::{ChartKind, Panel, PlotSpec};
use crate::config::PlotConfig;
use crate::error::{AnalysisError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fmt::Display;
use std::ops::Range;
use std::path::Path;

/// Width of one bar group in category units.
const BAR_GROUP_WIDTH: f64 = 0.8;

/// Draw `spec` into an SVG file at `path`.
pub fn render_svg(spec: &PlotSpec, path: &Path, plot: &PlotConfig) -> Result<()> {
    let columns = spec.panels.len().max(1) as u32;
    let root = SVGBackend::new(path, (plot.width * columns, plot.height)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| render_error(path, e))?;
    let root = root
        .titled(&spec.title, ("sans-serif", 24))
        .map_err(|e| render_error(path, e))?;

    let areas = root.split_evenly((1, spec.panels.len().max(1)));
    for (area, panel) in areas.iter().zip(&spec.panels) {
        draw_panel(area, panel).map_err(|e| render_error(path, e))?;
    }

    root.present().map_err(|e| render_error(path, e))?;
    log::debug!("Rendered {} to {}", spec.view, path.display());
    Ok(())
}

fn render_error(path: &Path, err: impl Display) -> AnalysisError {
    AnalysisError::Render(format!("{}: {err}", path.display()))
}

type DrawResult = std::result::Result<(), DrawingAreaErrorKind<std::io::Error>>;

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, panel: &Panel) -> DrawResult {
    let (x_range, y_range) = axis_ranges(panel);
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 18))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(55)
        .build_cartesian_2d(x_range, y_range)?;

    let categories = &panel.categories;
    let category_label = |x: &f64| {
        let idx = x.round();
        if (x - idx).abs() < 1e-6 && idx >= 0.0 {
            categories.get(idx as usize).cloned().unwrap_or_default()
        } else {
            String::new()
        }
    };

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str());
    if panel.kind == ChartKind::Bar {
        mesh.disable_x_mesh()
            .x_labels(categories.len() * 2 + 1)
            .x_label_formatter(&category_label);
    }
    mesh.draw()?;

    let groups = panel.series.len().max(1) as f64;
    for (idx, series) in panel.series.iter().enumerate() {
        let color = Palette99::pick(idx).to_rgba();
        match panel.kind {
            ChartKind::Line => {
                chart
                    .draw_series(LineSeries::new(
                        series.points.iter().copied(),
                        color.stroke_width(2),
                    ))?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                    });
            }
            ChartKind::Bar => {
                let width = BAR_GROUP_WIDTH / groups;
                chart
                    .draw_series(series.points.iter().map(|&(x, y)| {
                        let left = x - BAR_GROUP_WIDTH / 2.0 + width * idx as f64;
                        Rectangle::new([(left, 0.0), (left + width, y)], color.filled())
                    }))?
                    .label(series.label.as_str())
                    .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));
            }
        }
    }

    chart.draw_series(
        panel
            .annotations
            .iter()
            .map(|a| Text::new(a.text.clone(), (a.x, a.y), ("sans-serif", 12))),
    )?;

    if !panel.series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

/// Axis ranges covering every point, with the y axis starting at zero.
fn axis_ranges(panel: &Panel) -> (Range<f64>, Range<f64>) {
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_max: f64 = 0.0;
    for (x, y) in panel.points().filter(|(x, y)| x.is_finite() && y.is_finite()) {
        x_min = x_min.min(x);
        x_max = x_max.max(x);
        y_max = y_max.max(y);
    }

    let x_range = match panel.kind {
        ChartKind::Bar => -0.5..(panel.categories.len().max(1) as f64 - 0.5),
        ChartKind::Line if x_min > x_max => 0.0..1.0,
        ChartKind::Line if x_min == x_max => (x_min - 1.0)..(x_max + 1.0),
        ChartKind::Line => x_min..x_max,
    };
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };
    (x_range, 0.0..y_top)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plots::{Series, PlotView};

    fn panel(kind: ChartKind, points: Vec<(f64, f64)>) -> Panel {
        Panel {
            title: "DS1".to_string(),
            kind,
            x_label: "Core Count".to_string(),
            y_label: "Speedup".to_string(),
            categories: vec!["static".to_string(), "dynamic".to_string()],
            series: vec![Series {
                label: "Chunk size = 10".to_string(),
                points,
            }],
            annotations: Vec::new(),
        }
    }

    #[test]
    fn test_line_ranges_cover_points() {
        let (x, y) = axis_ranges(&panel(ChartKind::Line, vec![(2.0, 1.5), (32.0, 10.0)]));
        assert_eq!(x, 2.0..32.0);
        assert_eq!(y.start, 0.0);
        assert!(y.end > 10.0);
    }

    #[test]
    fn test_degenerate_ranges_are_widened() {
        let (x, y) = axis_ranges(&panel(ChartKind::Line, vec![(4.0, 0.0)]));
        assert_eq!(x, 3.0..5.0);
        assert_eq!(y, 0.0..1.0);

        let (x, _) = axis_ranges(&panel(ChartKind::Line, Vec::new()));
        assert_eq!(x, 0.0..1.0);
    }

    #[test]
    fn test_bar_range_spans_categories() {
        let (x, _) = axis_ranges(&panel(ChartKind::Bar, vec![(0.0, 2.0), (1.0, 3.0)]));
        assert_eq!(x, -0.5..1.5);
    }

    #[test]
    fn test_view_name_is_file_stem() {
        assert_eq!(PlotView::RuntimeByDataset.name(), "runtime-by-dataset");
    }
}
