//! Benchmark CSV Loading
//!
//! Discovers benchmark files in a directory, classifies them by file name
//! into the sequential and parallel families, and parses each family into
//! one table.
//!
//! # Pipeline
//!
//! ```text
//! dir entries ─► extension filter ─► FileClassifier ─┬─► sequential files ─► parse ─► BenchmarkTable
//!                                                    ├─► parallel files   ─► parse ─► BenchmarkTable
//!                                                    └─► unrecognized (warn, skipped)
//! ```
//!
//! Files are visited in sorted name order. Callers should still not depend
//! on cross-file row order.
//!
//! # Failure modes
//!
//! - Missing directory or no files of a family: empty table for that family
//! - Missing required columns: [`AnalysisError::MissingColumns`]
//! - Unparsable numeric cell: [`AnalysisError::InvalidValue`]

mod classify;
mod normalize;

pub use classify::{FileClass, FileClassifier};
pub use normalize::{clean_header, clean_headers, clean_text, normalize_record};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::records::{BenchmarkRecord, BenchmarkTable};
use crate::schema::{Column, Family, HeaderMap};
use csv::StringRecord;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Both family tables plus bookkeeping about the files seen.
#[derive(Debug, Clone)]
pub struct LoadedBenchmarks {
    pub sequential: BenchmarkTable,
    pub parallel: BenchmarkTable,
    /// Files that were parsed, with their family
    pub files: Vec<(PathBuf, Family)>,
    /// Files with the benchmark extension that matched neither pattern
    pub skipped: Vec<PathBuf>,
}

impl LoadedBenchmarks {
    fn empty() -> Self {
        Self {
            sequential: BenchmarkTable::new(Family::Sequential),
            parallel: BenchmarkTable::new(Family::Parallel),
            files: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Table of one family.
    pub fn table(&self, family: Family) -> &BenchmarkTable {
        match family {
            Family::Sequential => &self.sequential,
            Family::Parallel => &self.parallel,
        }
    }
}

/// Reads benchmark directories and files.
#[derive(Debug, Clone)]
pub struct BenchmarkLoader {
    classifier: FileClassifier,
    default_gcd_version: String,
}

impl BenchmarkLoader {
    /// Create a loader for the configured extension.
    ///
    /// Parallel files without a `GCD Version` column are tagged with the
    /// configured baseline variant.
    pub fn new(config: &AnalysisConfig) -> Result<Self> {
        Ok(Self {
            classifier: FileClassifier::new(&config.extension)?,
            default_gcd_version: config.baseline_gcd_version.clone(),
        })
    }

    /// The classifier used for file names.
    pub fn classifier(&self) -> &FileClassifier {
        &self.classifier
    }

    /// Load every benchmark file in `dir`.
    pub fn load_dir<P: AsRef<Path>>(&self, dir: P) -> Result<LoadedBenchmarks> {
        let dir = dir.as_ref();
        let mut loaded = LoadedBenchmarks::empty();

        if !dir.is_dir() {
            log::warn!(
                "Benchmarks directory {} does not exist, no records loaded",
                dir.display()
            );
            return Ok(loaded);
        }

        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(|e| AnalysisError::io(dir, e))? {
            let entry = entry.map_err(|e| AnalysisError::io(dir, e))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();

        for name in names {
            if !self.classifier.has_extension(&name) {
                continue;
            }
            let path = dir.join(&name);
            let Some(class) = self.classifier.classify(&name) else {
                log::warn!("Unknown file format: {name}");
                loaded.skipped.push(path);
                continue;
            };

            let table = self.load_file(&path, class.family)?;
            log::debug!(
                "Added {} file {} ({} rows)",
                class.family,
                name,
                table.len()
            );
            match class.family {
                Family::Sequential => loaded.sequential.extend(table),
                Family::Parallel => loaded.parallel.extend(table),
            }
            loaded.files.push((path, class.family));
        }

        log::info!(
            "Loaded {} sequential and {} parallel records from {} files ({} skipped)",
            loaded.sequential.len(),
            loaded.parallel.len(),
            loaded.files.len(),
            loaded.skipped.len()
        );
        Ok(loaded)
    }

    /// Parse one file as the given family.
    pub fn load_file<P: AsRef<Path>>(&self, path: P, family: Family) -> Result<BenchmarkTable> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|e| AnalysisError::io(path, e))?;
        self.load_reader(file, path, family)
    }

    /// Parse CSV text from any reader; `source` names it in errors.
    pub fn load_reader<R: Read>(
        &self,
        reader: R,
        source: &Path,
        family: Family,
    ) -> Result<BenchmarkTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let raw_headers = csv_reader
            .headers()
            .map_err(|e| AnalysisError::csv(source, e))?
            .clone();
        let headers = clean_headers(raw_headers.iter());
        let header_map = HeaderMap::resolve(source, family, &headers)?;

        let mut table = BenchmarkTable::new(family);
        for (idx, row) in csv_reader.records().enumerate() {
            let row = row.map_err(|e| AnalysisError::csv(source, e))?;
            let parser = RowParser {
                source,
                row: idx + 1,
                record: &row,
                headers: &header_map,
            };
            table.records.push(self.parse_row(&parser, family)?);
        }
        Ok(table)
    }

    fn parse_row(&self, p: &RowParser<'_>, family: Family) -> Result<BenchmarkRecord> {
        let lower = p.required::<u64>(Column::Lower)?;
        let upper = p.required::<u64>(Column::Upper)?;
        let execution_time = p.required::<f64>(Column::ExecutionTime)?;
        if !execution_time.is_finite() || execution_time < 0.0 {
            return Err(p.invalid(Column::ExecutionTime));
        }

        let gcd_version = if p.headers.contains(Column::GcdVersion) {
            p.text(Column::GcdVersion)
        } else {
            Some(self.default_gcd_version.clone())
        };

        let (core_count, scheduling_strategy, chunk_size) = match family {
            Family::Parallel => (
                Some(p.positive(Column::CoreCount)?),
                Some(
                    p.text(Column::SchedulingStrategy)
                        .ok_or_else(|| p.invalid(Column::SchedulingStrategy))?,
                ),
                Some(p.positive(Column::ChunkSize)?),
            ),
            Family::Sequential => (
                p.optional::<u32>(Column::CoreCount)?,
                p.text(Column::SchedulingStrategy),
                p.optional::<u32>(Column::ChunkSize)?,
            ),
        };

        Ok(BenchmarkRecord {
            filename: p.text(Column::Filename),
            lower,
            upper,
            core_count,
            gcd_version,
            scheduling_strategy,
            chunk_size,
            execution_time,
        })
    }
}

/// Typed access to the cells of one CSV row.
struct RowParser<'a> {
    source: &'a Path,
    row: usize,
    record: &'a StringRecord,
    headers: &'a HeaderMap,
}

impl RowParser<'_> {
    fn raw(&self, column: Column) -> Option<&str> {
        self.headers
            .position(column)
            .and_then(|idx| self.record.get(idx))
    }

    fn invalid(&self, column: Column) -> AnalysisError {
        AnalysisError::InvalidValue {
            path: self.source.to_path_buf(),
            row: self.row,
            column: column.name().to_string(),
            value: self.raw(column).unwrap_or_default().to_string(),
        }
    }

    /// Cleaned text; empty or absent cells are `None`.
    fn text(&self, column: Column) -> Option<String> {
        self.raw(column)
            .map(clean_text)
            .filter(|s| !s.is_empty())
    }

    fn optional<T: ParseCell>(&self, column: Column) -> Result<Option<T>> {
        match self.raw(column).map(str::trim) {
            None | Some("") => Ok(None),
            Some(cell) => T::parse_cell(cell)
                .map(Some)
                .ok_or_else(|| self.invalid(column)),
        }
    }

    fn required<T: ParseCell>(&self, column: Column) -> Result<T> {
        self.optional(column)?.ok_or_else(|| self.invalid(column))
    }

    fn positive(&self, column: Column) -> Result<u32> {
        match self.required::<u32>(column)? {
            0 => Err(self.invalid(column)),
            v => Ok(v),
        }
    }
}

/// Numeric cell parsing.
///
/// Integer columns also accept whole floats such as `15000.0`, which
/// spreadsheet exports tend to produce.
trait ParseCell: Sized {
    fn parse_cell(cell: &str) -> Option<Self>;
}

fn parse_whole<T: FromStr + TryFrom<u64>>(cell: &str) -> Option<T> {
    if let Ok(v) = cell.parse::<T>() {
        return Some(v);
    }
    let f = cell.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 {
        T::try_from(f as u64).ok()
    } else {
        None
    }
}

impl ParseCell for u64 {
    fn parse_cell(cell: &str) -> Option<Self> {
        parse_whole(cell)
    }
}

impl ParseCell for u32 {
    fn parse_cell(cell: &str) -> Option<Self> {
        parse_whole(cell)
    }
}

impl ParseCell for f64 {
    fn parse_cell(cell: &str) -> Option<Self> {
        cell.parse().ok()
    }
}
