//! Header and cell cleaning.
//!
//! The benchmark runner writes headers and strings with stray padding and
//! quote characters (`" Scheduling Strategy"`, `'dynamic'`). Cleaning
//! removes every `"` and `'` and trims surrounding whitespace. The result
//! contains neither, so cleaning is idempotent.

use crate::records::BenchmarkRecord;

fn is_quote(c: char) -> bool {
    c == '"' || c == '\''
}

/// Clean a header name.
pub fn clean_header(raw: &str) -> String {
    clean_text(raw)
}

/// Clean a textual cell.
pub fn clean_text(raw: &str) -> String {
    let unquoted: String = raw.trim().chars().filter(|c| !is_quote(*c)).collect();
    unquoted.trim().to_string()
}

/// Clean every header of a row.
pub fn clean_headers<'a, I>(headers: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    headers.into_iter().map(clean_header).collect()
}

/// Clean the textual fields of a record; numeric fields are untouched.
///
/// Empty strings become missing values.
pub fn normalize_record(record: &BenchmarkRecord) -> BenchmarkRecord {
    let clean = |value: &Option<String>| {
        value
            .as_deref()
            .map(clean_text)
            .filter(|s| !s.is_empty())
    };
    BenchmarkRecord {
        filename: clean(&record.filename),
        gcd_version: clean(&record.gcd_version),
        scheduling_strategy: clean(&record.scheduling_strategy),
        ..record.clone()
    }
}
