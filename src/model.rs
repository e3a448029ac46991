/// Core data types for the dust storm-event processing pipeline.
///
/// This module defines the shared domain model imported by all other modules,
/// plus the pipeline-wide error enum. It contains no I/O.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Source columns holding raw loss strings, in their database order.
pub const RAW_LOSS_COLUMNS: [&str; 6] = [
    "INJURIES_DIRECT",
    "INJURIES_INDIRECT",
    "DEATHS_DIRECT",
    "DEATHS_INDIRECT",
    "DAMAGE_PROPERTY",
    "DAMAGE_CROPS",
];

/// Sentinel written into an episode's merged scalar fields once two of its
/// constituent events disagree on a value. Irreversible: later agreement
/// does not clear it.
pub const MULTIPLE_VALUES: &str = "(Multiple values)";

// ---------------------------------------------------------------------------
// Record types
// ---------------------------------------------------------------------------

/// One source row as read from a storm-event details CSV file, keyed by
/// column header. Ephemeral: exists only between the reader and the
/// normalizer.
pub type RawRecord = BTreeMap<String, String>;

/// The nine numeric loss categories carried by every normalized event and,
/// as running sums, by episodes, yearly results, and the whole run.
///
/// Invariants (established by normalization, preserved by `add`):
///   injuries_overall == injuries_direct + injuries_indirect
///   deaths_overall   == deaths_direct + deaths_indirect
///   damage_overall   == damage_property + damage_crops
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LossFigures {
    pub injuries_direct: f64,
    pub injuries_indirect: f64,
    pub injuries_overall: f64,
    pub deaths_direct: f64,
    pub deaths_indirect: f64,
    pub deaths_overall: f64,
    pub damage_property: f64,
    pub damage_crops: f64,
    pub damage_overall: f64,
}

impl LossFigures {
    /// Component-wise accumulation. Addition is commutative, so episode and
    /// yearly totals do not depend on observation order.
    pub fn add(&mut self, other: &LossFigures) {
        self.injuries_direct += other.injuries_direct;
        self.injuries_indirect += other.injuries_indirect;
        self.injuries_overall += other.injuries_overall;
        self.deaths_direct += other.deaths_direct;
        self.deaths_indirect += other.deaths_indirect;
        self.deaths_overall += other.deaths_overall;
        self.damage_property += other.damage_property;
        self.damage_crops += other.damage_crops;
        self.damage_overall += other.damage_overall;
    }

    /// `(label, value)` pairs in emission order, for log lines and column
    /// writers.
    pub fn categories(&self) -> [(&'static str, f64); 9] {
        [
            ("INJURIES_DIRECT", self.injuries_direct),
            ("INJURIES_INDIRECT", self.injuries_indirect),
            ("INJURIES_OVERALL", self.injuries_overall),
            ("DEATHS_DIRECT", self.deaths_direct),
            ("DEATHS_INDIRECT", self.deaths_indirect),
            ("DEATHS_OVERALL", self.deaths_overall),
            ("DAMAGE_PROPERTY", self.damage_property),
            ("DAMAGE_CROPS", self.damage_crops),
            ("DAMAGE_OVERALL", self.damage_overall),
        ]
    }

    /// Looks up one category by its column label.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.categories()
            .iter()
            .find(|(name, _)| *name == label)
            .map(|(_, value)| *value)
    }
}

/// A normalized storm event that passed the search and usability filters.
///
/// The frequently used fields are typed; `fields` retains every source
/// column unchanged so the package writer can emit the full header set
/// without the normalizer having to know about all of them.
#[derive(Debug, Clone, Serialize)]
pub struct StormEvent {
    pub event_id: String,
    pub episode_id: String,
    pub event_type: String,
    pub event_narrative: String,
    pub episode_narrative: String,
    /// `None` when the source time zone was unrecognized or the computed
    /// timestamp was invalid.
    pub begin_datetime_utc: Option<DateTime<Utc>>,
    pub end_datetime_utc: Option<DateTime<Utc>>,
    pub losses: LossFigures,
    /// All source columns as originally read, keyed by header name.
    pub fields: BTreeMap<String, String>,
}

/// An aggregate of one or more events sharing an episode id.
///
/// Built incrementally by `analysis::episodes::EpisodeAggregator`; once
/// finalized it no longer carries per-event fields such as the event
/// narrative.
#[derive(Debug, Clone, Serialize)]
pub struct Episode {
    pub episode_id: String,
    /// Constituent event ids in first-encounter order.
    pub event_ids: Vec<String>,
    /// One merged copy of every non-loss scalar field. Divergent values are
    /// replaced by [`MULTIPLE_VALUES`].
    pub merged: BTreeMap<String, String>,
    /// Episode-scoped loss sums over all constituent events.
    pub totals: LossFigures,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that abort a pipeline run.
///
/// Per-event conditions (unrecognized time zone, invalid computed timestamp)
/// are warnings, not errors; see `normalize::NormalizeWarning`.
#[derive(Debug)]
pub enum PipelineError {
    /// A configured year's source file is missing. Fatal to the whole run:
    /// the current year is not processed and later years are not attempted.
    SourceNotFound { year: i32, path: String },
    /// The configured output package directory already exists. Checked
    /// before any year is read, to avoid overwrite ambiguity.
    OutputTargetExists(String),
    /// A loss column held content that is neither empty, numeric, nor
    /// numeric-with-K/M-suffix.
    MalformedLoss {
        event_id: String,
        column: String,
        value: String,
    },
    /// The run configuration is unusable (bad year list, unknown filter
    /// name, unreadable file, ...).
    InvalidConfig(String),
    Io(std::io::Error),
    Csv(csv::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::SourceNotFound { year, path } => {
                write!(f, "Source file for year {} was not found at {}", year, path)
            }
            PipelineError::OutputTargetExists(path) => {
                write!(f, "Output package target already exists: {}", path)
            }
            PipelineError::MalformedLoss {
                event_id,
                column,
                value,
            } => write!(
                f,
                "Event {} has a malformed loss value in {}: {:?}",
                event_id, column, value
            ),
            PipelineError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            PipelineError::Io(e) => write!(f, "I/O error: {}", e),
            PipelineError::Csv(e) => write!(f, "CSV error: {}", e),
            PipelineError::Json(e) => write!(f, "JSON error: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<std::io::Error> for PipelineError {
    fn from(e: std::io::Error) -> Self {
        PipelineError::Io(e)
    }
}

impl From<csv::Error> for PipelineError {
    fn from(e: csv::Error) -> Self {
        PipelineError::Csv(e)
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(e: serde_json::Error) -> Self {
        PipelineError::Json(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_figures_add_is_componentwise() {
        let mut a = LossFigures {
            injuries_direct: 1.0,
            damage_property: 2000.0,
            damage_overall: 2000.0,
            ..Default::default()
        };
        let b = LossFigures {
            injuries_direct: 2.0,
            damage_crops: 500.0,
            damage_overall: 500.0,
            ..Default::default()
        };
        a.add(&b);
        assert_eq!(a.injuries_direct, 3.0);
        assert_eq!(a.damage_property, 2000.0);
        assert_eq!(a.damage_crops, 500.0);
        assert_eq!(a.damage_overall, 2500.0);
    }

    #[test]
    fn test_loss_figures_category_lookup() {
        let losses = LossFigures {
            deaths_overall: 4.0,
            ..Default::default()
        };
        assert_eq!(losses.get("DEATHS_OVERALL"), Some(4.0));
        assert_eq!(losses.get("DEATHS_DIRECT"), Some(0.0));
        assert_eq!(losses.get("NOT_A_CATEGORY"), None);
    }
}
