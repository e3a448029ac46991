/// Output package writer.
///
/// A run emits one package directory containing, depending on the
/// configured selection: `events.csv` and `episodes.csv` (fixed column
/// order per record type), a `data.json` bundle (events + episodes +
/// summary in one document), and always a `log.txt` transcript written
/// last. Nothing is written until every configured year has processed
/// successfully, so a failed run leaves no partial package behind.

use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::config::OutputSelection;
use crate::logging::{self, Stage};
use crate::model::{Episode, LossFigures, PipelineError, StormEvent};
use crate::pipeline::AggregateResult;

// ---------------------------------------------------------------------------
// Column order
// ---------------------------------------------------------------------------

/// Event CSV columns: the storm-event database header set, with the derived
/// UTC and overall-loss columns inserted next to the source columns they
/// are computed from.
pub const EVENT_COLUMNS: [&str; 56] = [
    "BEGIN_YEARMONTH",
    "BEGIN_DAY",
    "BEGIN_TIME",
    "END_YEARMONTH",
    "END_DAY",
    "END_TIME",
    "EPISODE_ID",
    "EVENT_ID",
    "STATE",
    "STATE_FIPS",
    "YEAR",
    "MONTH_NAME",
    "EVENT_TYPE",
    "CZ_TYPE",
    "CZ_FIPS",
    "CZ_NAME",
    "WFO",
    "BEGIN_DATE_TIME",
    "BEGIN_DATE_TIME_UTC",
    "CZ_TIMEZONE",
    "END_DATE_TIME",
    "END_DATE_TIME_UTC",
    "INJURIES_DIRECT",
    "INJURIES_INDIRECT",
    "INJURIES_OVERALL",
    "DEATHS_DIRECT",
    "DEATHS_INDIRECT",
    "DEATHS_OVERALL",
    "DAMAGE_PROPERTY",
    "DAMAGE_CROPS",
    "DAMAGE_OVERALL",
    "SOURCE",
    "MAGNITUDE",
    "MAGNITUDE_TYPE",
    "FLOOD_CAUSE",
    "CATEGORY",
    "TOR_F_SCALE",
    "TOR_LENGTH",
    "TOR_WIDTH",
    "TOR_OTHER_WFO",
    "TOR_OTHER_CZ_STATE",
    "TOR_OTHER_CZ_FIPS",
    "TOR_OTHER_CZ_NAME",
    "BEGIN_RANGE",
    "BEGIN_AZIMUTH",
    "BEGIN_LOCATION",
    "END_RANGE",
    "END_AZIMUTH",
    "END_LOCATION",
    "BEGIN_LAT",
    "BEGIN_LON",
    "END_LAT",
    "END_LON",
    "EPISODE_NARRATIVE",
    "EVENT_NARRATIVE",
    "DATA_SOURCE",
];

/// The nine loss category labels shared by events and episode totals.
const LOSS_LABELS: [&str; 9] = [
    "INJURIES_DIRECT",
    "INJURIES_INDIRECT",
    "INJURIES_OVERALL",
    "DEATHS_DIRECT",
    "DEATHS_INDIRECT",
    "DEATHS_OVERALL",
    "DAMAGE_PROPERTY",
    "DAMAGE_CROPS",
    "DAMAGE_OVERALL",
];

/// Episode CSV columns: the event columns with `EVENT_IDS` inserted after
/// `EVENT_ID` and the nine `EPISODE_*` total columns after `DAMAGE_OVERALL`.
pub fn episode_columns() -> Vec<String> {
    let mut columns = Vec::with_capacity(EVENT_COLUMNS.len() + 10);
    for column in EVENT_COLUMNS {
        columns.push(column.to_string());
        if column == "EVENT_ID" {
            columns.push("EVENT_IDS".to_string());
        } else if column == "DAMAGE_OVERALL" {
            columns.extend(LOSS_LABELS.iter().map(|label| format!("EPISODE_{}", label)));
        }
    }
    columns
}

// ---------------------------------------------------------------------------
// Cell rendering
// ---------------------------------------------------------------------------

/// Loss figures are whole dollars/counts in almost all rows; render them
/// without a trailing ".0" so the CSV matches the source's numeric style.
fn format_loss(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

fn format_utc(value: Option<chrono::DateTime<chrono::Utc>>) -> String {
    value.map(|dt| dt.to_rfc3339()).unwrap_or_default()
}

fn event_cell(event: &StormEvent, column: &str) -> String {
    match column {
        "BEGIN_DATE_TIME_UTC" => format_utc(event.begin_datetime_utc),
        "END_DATE_TIME_UTC" => format_utc(event.end_datetime_utc),
        _ => match event.losses.get(column) {
            Some(value) => format_loss(value),
            None => event.fields.get(column).cloned().unwrap_or_default(),
        },
    }
}

fn episode_cell(episode: &Episode, column: &str) -> String {
    match column {
        // The single event id and per-event narrative do not exist at
        // episode scope.
        "EVENT_ID" | "EVENT_NARRATIVE" => String::new(),
        "EVENT_IDS" => episode.event_ids.join(","),
        _ => {
            if let Some(label) = column.strip_prefix("EPISODE_") {
                if let Some(value) = episode.totals.get(label) {
                    return format_loss(value);
                }
            }
            // Per-event loss columns are carried only as EPISODE_* sums.
            if LOSS_LABELS.contains(&column) {
                return String::new();
            }
            episode.merged.get(column).cloned().unwrap_or_default()
        }
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

pub fn write_events_csv(path: &Path, events: &[StormEvent]) -> Result<(), PipelineError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(EVENT_COLUMNS)?;
    for event in events {
        writer.write_record(EVENT_COLUMNS.iter().map(|column| event_cell(event, column)))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_episodes_csv(path: &Path, episodes: &[Episode]) -> Result<(), PipelineError> {
    let columns = episode_columns();
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for episode in episodes {
        writer.write_record(columns.iter().map(|column| episode_cell(episode, column)))?;
    }
    writer.flush()?;
    Ok(())
}

/// The JSON bundle: one document holding the whole run.
#[derive(Serialize)]
struct Bundle<'a> {
    date: String,
    years: &'a [i32],
    splits: &'a crate::pipeline::Splits,
    counts: Counts,
    losses: &'a LossFigures,
    events: &'a [StormEvent],
    episodes: &'a [Episode],
}

#[derive(Serialize)]
struct Counts {
    filtered: usize,
    total: usize,
}

pub fn write_json_bundle(path: &Path, result: &AggregateResult) -> Result<(), PipelineError> {
    let bundle = Bundle {
        date: chrono::Utc::now().to_rfc3339(),
        years: &result.years,
        splits: &result.splits,
        counts: Counts {
            filtered: result.events.len(),
            total: result.count_all_events,
        },
        losses: &result.losses,
        events: &result.events,
        episodes: &result.episodes,
    };
    fs::write(path, serde_json::to_string_pretty(&bundle)?)?;
    Ok(())
}

/// Creates the package directory and writes the selected artifacts, ending
/// with the log transcript. The pre-existence check happened before any
/// year was read; by the time we get here the run has fully succeeded.
pub fn write_package(
    package_dir: &Path,
    result: &AggregateResult,
    selection: OutputSelection,
) -> Result<(), PipelineError> {
    fs::create_dir_all(package_dir)?;
    logging::info(
        Stage::Output,
        None,
        &format!("Created output package directory {}", package_dir.display()),
    );

    if selection.includes_json() {
        let path = package_dir.join("data.json");
        write_json_bundle(&path, result)?;
        logging::info(Stage::Output, None, "Wrote data.json");
    }
    if selection.includes_csv() {
        write_events_csv(&package_dir.join("events.csv"), &result.events)?;
        logging::info(Stage::Output, None, "Wrote events.csv");
        write_episodes_csv(&package_dir.join("episodes.csv"), &result.episodes)?;
        logging::info(Stage::Output, None, "Wrote episodes.csv");
    }

    logging::info(Stage::Output, None, "Writing log file...");
    logging::save_transcript(&package_dir.join("log.txt"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MULTIPLE_VALUES;
    use std::collections::BTreeMap;

    fn sample_event() -> StormEvent {
        let mut fields = BTreeMap::new();
        fields.insert("EVENT_ID".to_string(), "5600001".to_string());
        fields.insert("EPISODE_ID".to_string(), "9001".to_string());
        fields.insert("EVENT_TYPE".to_string(), "Dust Storm".to_string());
        fields.insert("STATE".to_string(), "ARIZONA".to_string());
        StormEvent {
            event_id: "5600001".to_string(),
            episode_id: "9001".to_string(),
            event_type: "Dust Storm".to_string(),
            event_narrative: String::new(),
            episode_narrative: String::new(),
            begin_datetime_utc: None,
            end_datetime_utc: None,
            losses: LossFigures {
                damage_property: 2500.0,
                damage_overall: 2500.0,
                ..Default::default()
            },
            fields,
        }
    }

    #[test]
    fn test_episode_columns_extend_event_columns() {
        let columns = episode_columns();
        assert_eq!(columns.len(), EVENT_COLUMNS.len() + 10);

        let event_id_idx = columns.iter().position(|c| c == "EVENT_ID").unwrap();
        assert_eq!(columns[event_id_idx + 1], "EVENT_IDS");

        let overall_idx = columns.iter().position(|c| c == "DAMAGE_OVERALL").unwrap();
        assert_eq!(columns[overall_idx + 1], "EPISODE_INJURIES_DIRECT");
        assert_eq!(columns[overall_idx + 9], "EPISODE_DAMAGE_OVERALL");
    }

    #[test]
    fn test_event_cells_mix_typed_and_passthrough() {
        let event = sample_event();
        assert_eq!(event_cell(&event, "STATE"), "ARIZONA");
        assert_eq!(event_cell(&event, "DAMAGE_PROPERTY"), "2500");
        assert_eq!(event_cell(&event, "DAMAGE_CROPS"), "0");
        // Null UTC timestamp renders as an empty cell.
        assert_eq!(event_cell(&event, "BEGIN_DATE_TIME_UTC"), "");
        // Columns absent from the source row render empty too.
        assert_eq!(event_cell(&event, "TOR_F_SCALE"), "");
    }

    #[test]
    fn test_episode_cells() {
        let mut merged = BTreeMap::new();
        merged.insert("STATE".to_string(), MULTIPLE_VALUES.to_string());
        merged.insert("EPISODE_ID".to_string(), "9001".to_string());
        let episode = Episode {
            episode_id: "9001".to_string(),
            event_ids: vec!["5600001".to_string(), "5600002".to_string()],
            merged,
            totals: LossFigures {
                injuries_direct: 2.0,
                injuries_overall: 2.0,
                damage_property: 6500.0,
                damage_overall: 6500.0,
                ..Default::default()
            },
        };

        assert_eq!(episode_cell(&episode, "EVENT_IDS"), "5600001,5600002");
        assert_eq!(episode_cell(&episode, "EVENT_ID"), "");
        assert_eq!(episode_cell(&episode, "EVENT_NARRATIVE"), "");
        assert_eq!(episode_cell(&episode, "STATE"), MULTIPLE_VALUES);
        assert_eq!(episode_cell(&episode, "EPISODE_ID"), "9001");
        assert_eq!(episode_cell(&episode, "EPISODE_DAMAGE_PROPERTY"), "6500");
        assert_eq!(episode_cell(&episode, "EPISODE_INJURIES_DIRECT"), "2");
        // Per-event loss columns are blank at episode scope.
        assert_eq!(episode_cell(&episode, "DAMAGE_PROPERTY"), "");
    }

    #[test]
    fn test_loss_formatting() {
        assert_eq!(format_loss(0.0), "0");
        assert_eq!(format_loss(1_500_000.0), "1500000");
        assert_eq!(format_loss(2500.5), "2500.5");
    }
}
