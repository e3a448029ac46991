/// Source ingestion for the dust storm-event pipeline.
///
/// Submodules:
/// - `sed_csv` — storm-event details CSV files: file-name templating and
///   row parsing into raw records.
/// - `fixtures` — representative CSV payloads used by tests.
///
/// If a second source format is ever supported (the raw archives are also
/// distributed as XLSX), it gets its own file here rather than bloating
/// `sed_csv`.

pub mod fixtures;
pub mod sed_csv;
