/// Field normalization for raw storm-event records.
///
/// Converts the string-valued columns of one `RawRecord` into typed values:
/// the six raw loss figures (with K/M suffix multipliers), the three derived
/// overall loss figures, and the UTC begin/end timestamps (local time plus
/// the standard-time offset of the record's `CZ_TIMEZONE`).
///
/// Time-zone and timestamp problems are per-event warnings, returned to the
/// caller rather than logged here so the conversion stays a pure function.
/// A malformed loss value is an error: the source data is expected to be
/// numeric, empty, or numeric-with-suffix, and anything else indicates a
/// corrupt input file that should stop the run.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::model::{LossFigures, PipelineError, RawRecord, StormEvent};
use crate::timezones::utc_offset_hours;

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Non-fatal per-event conditions surfaced during normalization. The event
/// proceeds with `None` timestamps; the driver forwards these to the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizeWarning {
    /// `CZ_TIMEZONE` did not resolve to a known zone; both UTC timestamps
    /// are left unset.
    UnrecognizedTimeZone { event_id: String, zone: String },
    /// The local begin or end timestamp could not be interpreted as a valid
    /// date; that endpoint is left unset.
    InvalidTimestamp { event_id: String, endpoint: &'static str },
}

impl std::fmt::Display for NormalizeWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NormalizeWarning::UnrecognizedTimeZone { event_id, zone } => write!(
                f,
                "Event {} is recorded in unrecognized time zone {:?}; begin/end times not converted to UTC",
                event_id, zone
            ),
            NormalizeWarning::InvalidTimestamp { event_id, endpoint } => write!(
                f,
                "Event {} has an invalid {} timestamp; left unset",
                event_id, endpoint
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Loss parsing
// ---------------------------------------------------------------------------

/// Parses one raw loss string.
///
/// Empty or whitespace-only input means "no loss recorded" and yields 0.
/// Otherwise the leading numeric portion is parsed explicitly and an
/// optional trailing `K` or `M` applies a ×1e3 / ×1e6 multiplier (the
/// suffixes appear uppercase in the source data). Content that is neither
/// yields `None`; the caller turns that into a `MalformedLoss` error rather
/// than silently coercing to zero.
pub fn parse_loss_figure(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let (number_part, multiplier) = if let Some(n) = trimmed.strip_suffix('K') {
        (n, 1e3)
    } else if let Some(n) = trimmed.strip_suffix('M') {
        (n, 1e6)
    } else {
        (trimmed, 1.0)
    };

    let value: f64 = number_part.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value * multiplier)
}

fn parse_losses(record: &RawRecord, event_id: &str) -> Result<LossFigures, PipelineError> {
    let mut get = |column: &str| -> Result<f64, PipelineError> {
        let raw = record.get(column).map(String::as_str).unwrap_or("");
        parse_loss_figure(raw).ok_or_else(|| PipelineError::MalformedLoss {
            event_id: event_id.to_string(),
            column: column.to_string(),
            value: raw.to_string(),
        })
    };

    let injuries_direct = get("INJURIES_DIRECT")?;
    let injuries_indirect = get("INJURIES_INDIRECT")?;
    let deaths_direct = get("DEATHS_DIRECT")?;
    let deaths_indirect = get("DEATHS_INDIRECT")?;
    let damage_property = get("DAMAGE_PROPERTY")?;
    let damage_crops = get("DAMAGE_CROPS")?;

    Ok(LossFigures {
        injuries_direct,
        injuries_indirect,
        injuries_overall: injuries_direct + injuries_indirect,
        deaths_direct,
        deaths_indirect,
        deaths_overall: deaths_direct + deaths_indirect,
        damage_property,
        damage_crops,
        damage_overall: damage_property + damage_crops,
    })
}

// ---------------------------------------------------------------------------
// Timestamp parsing
// ---------------------------------------------------------------------------

/// Accepted layouts of the combined `BEGIN_DATE_TIME` / `END_DATE_TIME`
/// columns. Older files use `28-APR-96 14:30:00`; some exports use ISO-ish
/// `1996-04-28 14:30:00`.
const DATE_TIME_FORMATS: [&str; 2] = ["%d-%b-%y %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

/// Extracts the local (zone-naive) timestamp for one endpoint, trying the
/// combined column first and falling back to the `*_YEARMONTH` / `*_DAY` /
/// `*_TIME` component columns.
pub fn parse_local_datetime(record: &RawRecord, endpoint: &str) -> Option<NaiveDateTime> {
    let combined = record
        .get(&format!("{}_DATE_TIME", endpoint))
        .map(String::as_str)
        .unwrap_or("")
        .trim();
    if !combined.is_empty() {
        for format in DATE_TIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(combined, format) {
                return Some(dt);
            }
        }
    }

    // Component fallback: YEARMONTH is YYYYMM, TIME is HHMM (possibly with
    // leading zeros dropped).
    let component = |suffix: &str| -> Option<i64> {
        record
            .get(&format!("{}_{}", endpoint, suffix))
            .and_then(|s| s.trim().parse().ok())
    };
    let yearmonth = component("YEARMONTH")?;
    let day = component("DAY")?;
    let time = component("TIME")?;

    NaiveDate::from_ymd_opt(
        (yearmonth / 100) as i32,
        (yearmonth % 100) as u32,
        day as u32,
    )?
    .and_hms_opt((time / 100) as u32, (time % 100) as u32, 0)
}

/// Converts a zone-naive local timestamp to UTC given the zone's
/// standard-time offset: UTC = local − offset.
pub fn to_utc(local: NaiveDateTime, offset_hours: i32) -> DateTime<Utc> {
    Utc.from_utc_datetime(&(local - Duration::hours(offset_hours as i64)))
}

// ---------------------------------------------------------------------------
// Record normalization
// ---------------------------------------------------------------------------

/// Normalizes one raw record into a `StormEvent`.
///
/// All source columns pass through unchanged in `fields`; the typed fields
/// are derived from them. Returns the event together with any per-event
/// warnings raised along the way.
pub fn normalize_record(
    record: RawRecord,
) -> Result<(StormEvent, Vec<NormalizeWarning>), PipelineError> {
    let field = |column: &str| -> String { record.get(column).cloned().unwrap_or_default() };

    let event_id = field("EVENT_ID");
    let losses = parse_losses(&record, &event_id)?;

    let mut warnings = Vec::new();
    let raw_zone = field("CZ_TIMEZONE");
    let (begin_datetime_utc, end_datetime_utc) = match utc_offset_hours(&raw_zone) {
        Some(offset) => {
            let mut endpoint_utc = |endpoint: &'static str| -> Option<DateTime<Utc>> {
                match parse_local_datetime(&record, endpoint) {
                    Some(local) => Some(to_utc(local, offset)),
                    None => {
                        warnings.push(NormalizeWarning::InvalidTimestamp {
                            event_id: event_id.clone(),
                            endpoint,
                        });
                        None
                    }
                }
            };
            (endpoint_utc("BEGIN"), endpoint_utc("END"))
        }
        None => {
            warnings.push(NormalizeWarning::UnrecognizedTimeZone {
                event_id: event_id.clone(),
                zone: raw_zone.clone(),
            });
            (None, None)
        }
    };

    let event = StormEvent {
        event_id,
        episode_id: field("EPISODE_ID"),
        event_type: field("EVENT_TYPE"),
        event_narrative: field("EVENT_NARRATIVE"),
        episode_narrative: field("EPISODE_NARRATIVE"),
        begin_datetime_utc,
        end_datetime_utc,
        losses,
        fields: record,
    };
    Ok((event, warnings))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(entries: &[(&str, &str)]) -> RawRecord {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn minimal_record(zone: &str) -> RawRecord {
        record(&[
            ("EVENT_ID", "5522902"),
            ("EPISODE_ID", "90871"),
            ("EVENT_TYPE", "Dust Storm"),
            ("CZ_TIMEZONE", zone),
            ("BEGIN_DATE_TIME", "28-APR-96 14:30:00"),
            ("END_DATE_TIME", "28-APR-96 15:00:00"),
            ("EVENT_NARRATIVE", "Blowing dust closed I-10."),
            ("EPISODE_NARRATIVE", ""),
            ("INJURIES_DIRECT", "2"),
            ("INJURIES_INDIRECT", "1"),
            ("DEATHS_DIRECT", ""),
            ("DEATHS_INDIRECT", ""),
            ("DAMAGE_PROPERTY", "2.5K"),
            ("DAMAGE_CROPS", "1M"),
        ])
    }

    // --- Loss parsing -------------------------------------------------------

    #[test]
    fn test_parse_loss_figure_table() {
        assert_eq!(parse_loss_figure(""), Some(0.0));
        assert_eq!(parse_loss_figure("12"), Some(12.0));
        assert_eq!(parse_loss_figure("3K"), Some(3000.0));
        assert_eq!(parse_loss_figure("1.5M"), Some(1_500_000.0));
        assert_eq!(parse_loss_figure("0.00"), Some(0.0));
    }

    #[test]
    fn test_parse_loss_figure_rejects_non_numeric() {
        assert_eq!(parse_loss_figure("unknown"), None);
        assert_eq!(parse_loss_figure("K"), None);
        assert_eq!(parse_loss_figure("-5"), None);
    }

    #[test]
    fn test_malformed_loss_aborts_with_context() {
        let mut rec = minimal_record("MST");
        rec.insert("DAMAGE_PROPERTY".to_string(), "lots".to_string());
        match normalize_record(rec) {
            Err(PipelineError::MalformedLoss {
                event_id,
                column,
                value,
            }) => {
                assert_eq!(event_id, "5522902");
                assert_eq!(column, "DAMAGE_PROPERTY");
                assert_eq!(value, "lots");
            }
            other => panic!("expected MalformedLoss, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_overall_figures_are_sums() {
        let (event, _) = normalize_record(minimal_record("MST")).unwrap();
        assert_eq!(event.losses.injuries_overall, 3.0);
        assert_eq!(event.losses.deaths_overall, 0.0);
        assert_eq!(event.losses.damage_property, 2500.0);
        assert_eq!(event.losses.damage_crops, 1_000_000.0);
        assert_eq!(event.losses.damage_overall, 1_002_500.0);
    }

    // --- Timestamps ---------------------------------------------------------

    #[test]
    fn test_mst_local_time_shifts_forward_seven_hours() {
        let (event, warnings) = normalize_record(minimal_record("MST")).unwrap();
        assert!(warnings.is_empty());
        let begin = event.begin_datetime_utc.expect("begin should convert");
        // 14:30 MST (UTC-7) is 21:30 UTC.
        assert_eq!(
            begin,
            Utc.with_ymd_and_hms(1996, 4, 28, 21, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_hyphenated_zone_converts_via_prefix() {
        let (event, warnings) = normalize_record(minimal_record("AKST-9")).unwrap();
        assert!(warnings.is_empty());
        let begin = event.begin_datetime_utc.expect("begin should convert");
        assert_eq!(begin, Utc.with_ymd_and_hms(1996, 4, 28, 23, 30, 0).unwrap());
    }

    #[test]
    fn test_unrecognized_zone_yields_null_timestamps_and_one_warning() {
        let (event, warnings) = normalize_record(minimal_record("XYZ")).unwrap();
        assert!(event.begin_datetime_utc.is_none());
        assert!(event.end_datetime_utc.is_none());
        assert_eq!(
            warnings,
            vec![NormalizeWarning::UnrecognizedTimeZone {
                event_id: "5522902".to_string(),
                zone: "XYZ".to_string(),
            }]
        );
    }

    #[test]
    fn test_component_fallback_when_combined_column_missing() {
        let rec = record(&[
            ("EVENT_ID", "42"),
            ("CZ_TIMEZONE", "CST"),
            ("BEGIN_YEARMONTH", "199604"),
            ("BEGIN_DAY", "15"),
            ("BEGIN_TIME", "830"),
            ("END_YEARMONTH", "199604"),
            ("END_DAY", "15"),
            ("END_TIME", "900"),
        ]);
        let (event, warnings) = normalize_record(rec).unwrap();
        assert!(warnings.is_empty());
        // 08:30 CST (UTC-6) is 14:30 UTC.
        assert_eq!(
            event.begin_datetime_utc.unwrap(),
            Utc.with_ymd_and_hms(1996, 4, 15, 14, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_invalid_date_warns_and_proceeds() {
        let mut rec = minimal_record("CST");
        rec.insert("BEGIN_DATE_TIME".to_string(), "31-FEB-96 10:00:00".to_string());
        rec.remove("BEGIN_YEARMONTH");
        let (event, warnings) = normalize_record(rec).unwrap();
        assert!(event.begin_datetime_utc.is_none());
        assert!(event.end_datetime_utc.is_some());
        assert!(warnings.contains(&NormalizeWarning::InvalidTimestamp {
            event_id: "5522902".to_string(),
            endpoint: "BEGIN",
        }));
    }

    #[test]
    fn test_iso_style_combined_column_accepted() {
        let mut rec = minimal_record("PST");
        rec.insert("BEGIN_DATE_TIME".to_string(), "1996-04-28 14:30:00".to_string());
        let (event, _) = normalize_record(rec).unwrap();
        assert_eq!(
            event.begin_datetime_utc.unwrap(),
            Utc.with_ymd_and_hms(1996, 4, 28, 22, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_samoa_positive_offset_shifts_backward() {
        let (event, _) = normalize_record(minimal_record("SST")).unwrap();
        // 14:30 at UTC+13 is 01:30 UTC the same calendar day.
        assert_eq!(
            event.begin_datetime_utc.unwrap(),
            Utc.with_ymd_and_hms(1996, 4, 28, 1, 30, 0).unwrap()
        );
    }
}
