/// dustproc_service: dust storm event extraction from yearly storm-event archives.
///
/// # Module structure
///
/// ```text
/// dustproc_service
/// ├── model       — shared data types (RawRecord, StormEvent, Episode, PipelineError, …)
/// ├── config      — run configuration loader (run.toml)
/// ├── logging     — leveled, buffered run transcript
/// ├── timezones   — fixed local-to-UTC offset table for CZ_TIMEZONE codes
/// ├── normalize   — raw record typing: loss figures, timestamps, UTC conversion
/// ├── filter      — named search filters and output-shape usability checks
/// ├── ingest
/// │   ├── sed_csv — yearly storm-event CSV reading (YYYY file-name template)
/// │   └── fixtures (test only) — representative yearly CSV payloads
/// ├── analysis
/// │   └── episodes — event-to-episode aggregation with merged scalar fields
/// ├── pipeline    — per-year fold and cross-year accumulation driver
/// └── output      — package emission (events.csv, episodes.csv, data.json, log.txt)
/// ```

/// Public modules
pub mod analysis;
pub mod config;
pub mod filter;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod timezones;
