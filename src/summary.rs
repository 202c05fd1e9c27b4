//! Performance Summary Table
//!
//! Per `(Core Count, Upper)` group of raw runs: the three fastest runs,
//! median, mean, min, max and the spread of the mean towards each extreme.
//!
//! # Output
//!
//! | Column | Description |
//! |--------|-------------|
//! | `First_Runtime` .. `Third_Runtime` | 1st-3rd run in ascending time order, empty when the group is smaller |
//! | `Median_Runtime` | Median (mean of the two middle runs for even counts) |
//! | `Mean_Runtime`, `Min_Runtime`, `Max_Runtime` | |
//! | `Mean-Min Difference` | mean - min |
//! | `Mean-Max Difference` | max - mean |
//!
//! All statistics are rounded to 3 decimal places after computation. Rows are
//! ordered by `(Upper, Core Count)`.

use crate::records::BenchmarkRecord;
use std::fmt;

/// Column headers in display order.
pub const SUMMARY_HEADERS: [&str; 11] = [
    "Core Count",
    "Upper",
    "First_Runtime",
    "Second_Runtime",
    "Third_Runtime",
    "Median_Runtime",
    "Mean_Runtime",
    "Min_Runtime",
    "Max_Runtime",
    "Mean-Min Difference",
    "Mean-Max Difference",
];

/// Statistics of one `(Core Count, Upper)` group.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryRow {
    /// Missing for sequential runs
    pub core_count: Option<u32>,
    pub upper: u64,
    pub first: Option<f64>,
    pub second: Option<f64>,
    pub third: Option<f64>,
    pub median: f64,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub mean_minus_min: f64,
    pub max_minus_mean: f64,
    /// Number of runs in the group
    pub runs: usize,
}

impl SummaryRow {
    /// Statistics over runs sorted ascending; `times` must not be empty.
    fn from_sorted(core_count: Option<u32>, upper: u64, times: &[f64]) -> Self {
        let n = times.len();
        let mean = times.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 1 {
            times[n / 2]
        } else {
            (times[n / 2 - 1] + times[n / 2]) / 2.0
        };
        let min = times[0];
        let max = times[n - 1];

        Self {
            core_count,
            upper,
            first: times.first().copied().map(round3),
            second: times.get(1).copied().map(round3),
            third: times.get(2).copied().map(round3),
            median: round3(median),
            mean: round3(mean),
            min: round3(min),
            max: round3(max),
            mean_minus_min: round3(mean - min),
            max_minus_mean: round3(max - mean),
            runs: n,
        }
    }

    fn cells(&self) -> Vec<String> {
        let opt = |v: Option<f64>| v.map(fmt3).unwrap_or_default();
        vec![
            self.core_count.map(|c| c.to_string()).unwrap_or_default(),
            self.upper.to_string(),
            opt(self.first),
            opt(self.second),
            opt(self.third),
            fmt3(self.median),
            fmt3(self.mean),
            fmt3(self.min),
            fmt3(self.max),
            fmt3(self.mean_minus_min),
            fmt3(self.max_minus_mean),
        ]
    }
}

/// Round to 3 decimal places.
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

fn grid_line(cells: impl Iterator<Item = String>) -> String {
    format!("| {} |\n", cells.collect::<Vec<_>>().join(" | "))
}

fn fmt3(value: f64) -> String {
    format!("{value:.3}")
}

/// Summary statistics for a raw benchmark table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SummaryTable {
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    /// Group raw runs by `(Core Count, Upper)` and summarise each group.
    pub fn build(records: &[BenchmarkRecord]) -> Self {
        let mut sorted: Vec<&BenchmarkRecord> = records.iter().collect();
        sorted.sort_by(|a, b| {
            a.core_count
                .cmp(&b.core_count)
                .then(a.upper.cmp(&b.upper))
                .then(a.execution_time.total_cmp(&b.execution_time))
        });

        let mut rows = Vec::new();
        let mut times: Vec<f64> = Vec::new();
        let mut current: Option<(Option<u32>, u64)> = None;
        for record in sorted {
            let key = (record.core_count, record.upper);
            if current != Some(key) {
                if let Some((cores, upper)) = current {
                    rows.push(SummaryRow::from_sorted(cores, upper, &times));
                }
                current = Some(key);
                times.clear();
            }
            times.push(record.execution_time);
        }
        if let Some((cores, upper)) = current {
            rows.push(SummaryRow::from_sorted(cores, upper, &times));
        }

        rows.sort_by(|a, b| a.upper.cmp(&b.upper).then(a.core_count.cmp(&b.core_count)));
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Render as a pipe-delimited text grid with a header row and no index.
    pub fn render(&self) -> String {
        let body: Vec<Vec<String>> = self.rows.iter().map(SummaryRow::cells).collect();
        let widths: Vec<usize> = SUMMARY_HEADERS
            .iter()
            .enumerate()
            .map(|(i, h)| {
                body.iter()
                    .map(|row| row[i].len())
                    .chain(std::iter::once(h.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let mut out = grid_line(
            SUMMARY_HEADERS
                .iter()
                .zip(&widths)
                .map(|(h, &w)| format!("{h:>w$}")),
        );
        out.push_str(&format!(
            "|{}|\n",
            widths
                .iter()
                .map(|w| format!("{}:", "-".repeat(w + 1)))
                .collect::<Vec<_>>()
                .join("|")
        ));
        for row in &body {
            out.push_str(&grid_line(
                row.iter().zip(&widths).map(|(c, &w)| format!("{c:>w$}")),
            ));
        }
        out
    }
}

impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(cores: u32, upper: u64, time: f64) -> BenchmarkRecord {
        BenchmarkRecord {
            filename: None,
            lower: 1,
            upper,
            core_count: Some(cores),
            gcd_version: Some("Euclid".to_string()),
            scheduling_strategy: Some("static".to_string()),
            chunk_size: Some(1),
            execution_time: time,
        }
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(4.0000001), 4.0);
        assert_eq!(round3(1.8333333), 1.833);
        assert_eq!(round3(2.71828), 2.718);
    }

    #[test]
    fn test_order_statistics() {
        let records = vec![
            run(2, 15000, 6.0),
            run(2, 15000, 2.0),
            run(2, 15000, 4.0),
            run(2, 15000, 8.0),
        ];
        let table = SummaryTable::build(&records);
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.first, Some(2.0));
        assert_eq!(row.second, Some(4.0));
        assert_eq!(row.third, Some(6.0));
        assert_eq!(row.median, 5.0);
        assert_eq!(row.mean, 5.0);
        assert_eq!(row.min, 2.0);
        assert_eq!(row.max, 8.0);
        assert_eq!(row.mean_minus_min, 3.0);
        assert_eq!(row.max_minus_mean, 3.0);
    }

    #[test]
    fn test_small_groups_have_missing_ranks() {
        let table = SummaryTable::build(&[run(4, 30000, 1.5)]);
        let row = &table.rows[0];
        assert_eq!(row.first, Some(1.5));
        assert_eq!(row.second, None);
        assert_eq!(row.third, None);
        assert_eq!(row.median, 1.5);
    }

    #[test]
    fn test_rows_sorted_by_upper_then_cores() {
        let records = vec![
            run(8, 15000, 1.0),
            run(2, 30000, 1.0),
            run(2, 15000, 1.0),
            run(4, 30000, 1.0),
        ];
        let table = SummaryTable::build(&records);
        let order: Vec<(u64, Option<u32>)> =
            table.rows.iter().map(|r| (r.upper, r.core_count)).collect();
        assert_eq!(
            order,
            vec![
                (15000, Some(2)),
                (15000, Some(8)),
                (30000, Some(2)),
                (30000, Some(4))
            ]
        );
    }

    #[test]
    fn test_render_has_headers_and_one_line_per_row() {
        let records = vec![run(2, 15000, 1.0), run(4, 15000, 0.6666666)];
        let text = SummaryTable::build(&records).render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 2);
        for header in SUMMARY_HEADERS {
            assert!(lines[0].contains(header));
        }
        assert!(lines[1].starts_with("|-"));
        assert!(text.contains("0.667"));
        assert!(!text.contains("0.6666"));
        // Every line has the same width
        assert!(lines.iter().all(|l| l.len() == lines[0].len()));
    }

    #[test]
    fn test_empty_input() {
        let table = SummaryTable::build(&[]);
        assert!(table.is_empty());
        assert_eq!(table.render().lines().count(), 2);
    }
}
