/// Pipeline driver: the per-year fold and the cross-year accumulation.
///
/// Years are processed strictly in configured order; each year is fully
/// read, normalized, filtered, and aggregated before the next one starts.
/// Nothing touches the output directory until every year has succeeded;
/// the only pre-run filesystem interaction is the existence check on the
/// package path.

use std::time::Instant;

use serde::Serialize;

use crate::analysis::episodes::EpisodeAggregator;
use crate::config::RunConfig;
use crate::filter::{DataFormat, SearchFilter};
use crate::ingest::sed_csv;
use crate::logging::{self, Stage};
use crate::model::{Episode, LossFigures, PipelineError, RawRecord, StormEvent};
use crate::normalize::normalize_record;
use crate::output;

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// Everything one year's processing produced.
#[derive(Debug)]
pub struct YearlyResult {
    pub year: i32,
    /// Events passing both the search and usability filters, in source order.
    pub events: Vec<StormEvent>,
    /// Count of all source rows seen, retained or not.
    pub count_all_events: usize,
    /// Finalized episodes in first-encounter order.
    pub episodes: Vec<Episode>,
    /// Loss totals over the retained events.
    pub losses: LossFigures,
}

/// Cumulative offsets of each year's first event/episode within the
/// concatenated run-wide lists. Seeded with 0; entry `i+1` is where year
/// `i`'s slice ends. Kept for traceability of which year produced which
/// slice of the output.
#[derive(Debug, Clone, Serialize)]
pub struct Splits {
    pub events: Vec<usize>,
    pub episodes: Vec<usize>,
}

/// The whole run, accumulated across years in configured order.
#[derive(Debug)]
pub struct AggregateResult {
    pub years: Vec<i32>,
    pub events: Vec<StormEvent>,
    pub count_all_events: usize,
    pub episodes: Vec<Episode>,
    pub losses: LossFigures,
    pub splits: Splits,
}

impl AggregateResult {
    fn new() -> Self {
        Self {
            years: Vec::new(),
            events: Vec::new(),
            count_all_events: 0,
            episodes: Vec::new(),
            losses: LossFigures::default(),
            splits: Splits {
                events: vec![0],
                episodes: vec![0],
            },
        }
    }

    /// Folds one year's result in. Order matters for the splits
    /// bookkeeping and list concatenation, so callers absorb years in
    /// configured order only.
    fn absorb(&mut self, yearly: YearlyResult) {
        self.years.push(yearly.year);
        self.count_all_events += yearly.count_all_events;
        self.losses.add(&yearly.losses);
        self.events.extend(yearly.events);
        self.episodes.extend(yearly.episodes);
        self.splits.events.push(self.events.len());
        self.splits.episodes.push(self.episodes.len());
    }
}

// ---------------------------------------------------------------------------
// Per-year processing
// ---------------------------------------------------------------------------

/// Normalizes, filters, and aggregates one year's raw records.
pub fn process_year(
    year: i32,
    records: Vec<RawRecord>,
    filter: SearchFilter,
    format: DataFormat,
) -> Result<YearlyResult, PipelineError> {
    let mut events = Vec::new();
    let mut count_all_events = 0;
    let mut losses = LossFigures::default();
    let mut aggregator = EpisodeAggregator::new();

    for record in records {
        count_all_events += 1;
        let (event, warnings) = normalize_record(record)?;
        for warning in &warnings {
            logging::warn(Stage::Normalize, Some(&event.event_id), &warning.to_string());
        }
        if !(filter.matches(&event) && format.usable(&event)) {
            continue;
        }
        losses.add(&event.losses);
        aggregator.observe(&event);
        events.push(event);
    }

    let episodes = aggregator.finalize();
    logging::info(
        Stage::Aggregate,
        None,
        &format!(
            "{}/{} events and {} episodes passed search filter",
            events.len(),
            count_all_events,
            episodes.len()
        ),
    );
    for (label, value) in losses.categories() {
        logging::info(Stage::Aggregate, None, &format!("{}: {}", label, value));
    }

    Ok(YearlyResult {
        year,
        events,
        count_all_events,
        episodes,
        losses,
    })
}

// ---------------------------------------------------------------------------
// Run driver
// ---------------------------------------------------------------------------

/// Runs the whole pipeline for one configuration: every configured year in
/// order, then emission. Returns the accumulated result (also written to
/// the output package).
pub fn run(config: &RunConfig) -> Result<AggregateResult, PipelineError> {
    let started = Instant::now();

    let filter = config.parsed_filter()?;
    let format = config.parsed_data_format()?;
    let selection = config.parsed_output()?;
    let years = config.expanded_years()?;

    let package_dir = config.package_path();
    logging::info(
        Stage::System,
        None,
        &format!("Output package will be written to {}", package_dir.display()),
    );
    if package_dir.exists() {
        return Err(PipelineError::OutputTargetExists(
            package_dir.display().to_string(),
        ));
    }

    let mut result = AggregateResult::new();
    for (i, &year) in years.iter().enumerate() {
        let file = sed_csv::source_file_name(&config.source_name_format, year);
        logging::info(
            Stage::Ingest,
            None,
            &format!("({}/{}) Processing {}...", i + 1, years.len(), file),
        );
        let year_started = Instant::now();

        let records = sed_csv::read_year(&config.input_dir, &config.source_name_format, year)?;
        let yearly = process_year(year, records, filter, format)?;
        result.absorb(yearly);

        logging::info(
            Stage::Ingest,
            None,
            &format!(
                "Finished processing {} in {:.3} s",
                file,
                year_started.elapsed().as_secs_f64()
            ),
        );
    }

    log_run_summary(&result);
    output::write_package(&package_dir, &result, selection)?;

    logging::info(
        Stage::System,
        None,
        &format!(
            "Run completed successfully, took {:.3} s",
            started.elapsed().as_secs_f64()
        ),
    );
    Ok(result)
}

fn log_run_summary(result: &AggregateResult) {
    let percent = if result.count_all_events > 0 {
        result.events.len() as f64 / result.count_all_events as f64 * 100.0
    } else {
        0.0
    };
    logging::info(
        Stage::Aggregate,
        None,
        &format!(
            "Overall: {}/{} ({:.2}%) events and {} episodes passed search filter",
            result.events.len(),
            result.count_all_events,
            percent,
            result.episodes.len()
        ),
    );
    for (label, value) in result.losses.categories() {
        logging::info(Stage::Aggregate, None, &format!("{}: {}", label, value));
    }
}
