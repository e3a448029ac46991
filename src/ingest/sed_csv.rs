/// Storm-event details CSV reader.
///
/// One source file per year, named by a template in which every occurrence
/// of `YYYY` (any letter case) is replaced with the year. Rows are delivered
/// as `RawRecord`s keyed by the file's header names; all typing happens
/// later in `normalize`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::{PipelineError, RawRecord};

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

/// Replaces every case-insensitive occurrence of `YYYY` in `template` with
/// the given year.
///
/// # Example
/// ```
/// use dustproc_service::ingest::sed_csv::source_file_name;
///
/// assert_eq!(source_file_name("SED-YYYY.csv", 1996), "SED-1996.csv");
/// assert_eq!(source_file_name("details_yyyy.csv", 2004), "details_2004.csv");
/// ```
pub fn source_file_name(template: &str, year: i32) -> String {
    let year_text = year.to_string();
    // "yyyy" is pure ASCII, so byte offsets in the lower-cased copy line up
    // with the original.
    let lower = template.to_ascii_lowercase();
    let mut out = String::with_capacity(template.len());
    let mut pos = 0;
    while let Some(found) = lower[pos..].find("yyyy") {
        let start = pos + found;
        out.push_str(&template[pos..start]);
        out.push_str(&year_text);
        pos = start + 4;
    }
    out.push_str(&template[pos..]);
    out
}

/// Full path of one year's source file.
pub fn source_path(input_dir: &str, template: &str, year: i32) -> PathBuf {
    Path::new(input_dir).join(source_file_name(template, year))
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parses CSV text into raw records, one per data row, keyed by the header
/// row's column names.
pub fn parse_records(csv_text: &str) -> Result<Vec<RawRecord>, PipelineError> {
    let mut reader = csv::Reader::from_reader(csv_text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let record: RawRecord = headers
            .iter()
            .zip(row.iter())
            .map(|(header, value)| (header.to_string(), value.to_string()))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Reads and parses one year's source file.
///
/// # Errors
/// - `PipelineError::SourceNotFound` — the year's file does not exist. The
///   driver treats this as fatal to the whole run.
/// - `PipelineError::Io` / `PipelineError::Csv` — unreadable or malformed
///   file contents.
pub fn read_year(
    input_dir: &str,
    template: &str,
    year: i32,
) -> Result<Vec<RawRecord>, PipelineError> {
    let path = source_path(input_dir, template, year);
    if !path.exists() {
        return Err(PipelineError::SourceNotFound {
            year,
            path: path.display().to_string(),
        });
    }
    let contents = fs::read_to_string(&path)?;
    parse_records(&contents)
}

/// Convenience for tests and callers that index rows by a column value.
pub fn index_by_column<'a>(
    records: &'a [RawRecord],
    column: &str,
) -> BTreeMap<&'a str, &'a RawRecord> {
    records
        .iter()
        .filter_map(|r| r.get(column).map(|v| (v.as_str(), r)))
        .collect()
}
