/// Search and usability filters for storm events.
///
/// A `SearchFilter` decides dust-relevance from the event type and the two
/// narrative texts; a `DataFormat` adds the usability requirement of the
/// selected output shape (point plots need a begin coordinate). An event is
/// retained only when both predicates pass.

use crate::model::StormEvent;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Search filters
// ---------------------------------------------------------------------------

/// The named search predicates, from primitive to composite.
///
/// Configuration uses the short codes (`A`, `EO`, `DO`, `E`, `PE`, `HW`,
/// `HWD`, `TW`, `TWD`, `HTWD`); see [`SearchFilter::from_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    /// Every event passes.
    All,
    /// Event type is "Dust Storm" or "Dust Devil".
    EventOnly,
    /// Some narrative word, stripped of non-alphabetic characters and
    /// lower-cased, starts with "dust" and is not exactly "dusting".
    DescriptionOnly,
    /// `EventOnly` or `DescriptionOnly`.
    Exhaustive,
    /// `Exhaustive`, excluding event types that co-occur with "dust" words
    /// for unrelated reasons (dustings of snow, dust kicked up by floods).
    PartialExhaustive,
    HighWind,
    HighWindAndDust,
    ThunderstormWind,
    ThunderstormWindAndDust,
    /// `HighWindAndDust` or `ThunderstormWindAndDust`.
    HighOrThunderstormWindAndDust,
}

/// Event types excluded by `PartialExhaustive` even when a narrative
/// mentions dust.
const NON_PE_TYPES: [&str; 6] = [
    "Winter Weather",
    "Heavy Snow",
    "Flash Flood",
    "Winter Storm",
    "Tornado",
    "Drought",
];

impl SearchFilter {
    /// Evaluates this predicate against a normalized event.
    pub fn matches(&self, event: &StormEvent) -> bool {
        match self {
            SearchFilter::All => true,
            SearchFilter::EventOnly => {
                event.event_type == "Dust Storm" || event.event_type == "Dust Devil"
            }
            SearchFilter::DescriptionOnly => {
                mentions_dust(&event.event_narrative) || mentions_dust(&event.episode_narrative)
            }
            SearchFilter::Exhaustive => {
                SearchFilter::EventOnly.matches(event)
                    || SearchFilter::DescriptionOnly.matches(event)
            }
            SearchFilter::PartialExhaustive => {
                SearchFilter::Exhaustive.matches(event)
                    && !NON_PE_TYPES.contains(&event.event_type.as_str())
            }
            SearchFilter::HighWind => event.event_type == "High Wind",
            SearchFilter::HighWindAndDust => {
                SearchFilter::HighWind.matches(event)
                    && SearchFilter::DescriptionOnly.matches(event)
            }
            SearchFilter::ThunderstormWind => event.event_type == "Thunderstorm Wind",
            SearchFilter::ThunderstormWindAndDust => {
                SearchFilter::ThunderstormWind.matches(event)
                    && SearchFilter::DescriptionOnly.matches(event)
            }
            SearchFilter::HighOrThunderstormWindAndDust => {
                SearchFilter::HighWindAndDust.matches(event)
                    || SearchFilter::ThunderstormWindAndDust.matches(event)
            }
        }
    }
}

impl FromStr for SearchFilter {
    type Err = String;

    /// Accepts the configuration short codes and, for readability in test
    /// code, the variant names themselves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" | "All" => Ok(SearchFilter::All),
            "EO" | "EventOnly" => Ok(SearchFilter::EventOnly),
            "DO" | "DescriptionOnly" => Ok(SearchFilter::DescriptionOnly),
            "E" | "Exhaustive" => Ok(SearchFilter::Exhaustive),
            "PE" | "PartialExhaustive" => Ok(SearchFilter::PartialExhaustive),
            "HW" | "HighWind" => Ok(SearchFilter::HighWind),
            "HWD" | "HighWindAndDust" => Ok(SearchFilter::HighWindAndDust),
            "TW" | "ThunderstormWind" => Ok(SearchFilter::ThunderstormWind),
            "TWD" | "ThunderstormWindAndDust" => Ok(SearchFilter::ThunderstormWindAndDust),
            "HTWD" | "HighOrThunderstormWindAndDust" => {
                Ok(SearchFilter::HighOrThunderstormWindAndDust)
            }
            other => Err(format!("unknown search filter {:?}", other)),
        }
    }
}

/// True iff some whitespace-delimited word of `text`, after dropping all
/// non-alphabetic characters and lower-casing, starts with "dust" but is
/// not exactly "dusting".
///
/// The exact-match exclusion keeps "a light dusting of snow" out while
/// still matching "dust storm", "duststorm", "dust-laden", "(dust)".
fn mentions_dust(text: &str) -> bool {
    text.split_whitespace().any(|word| {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        cleaned.starts_with("dust") && cleaned != "dusting"
    })
}

// ---------------------------------------------------------------------------
// Usability filter
// ---------------------------------------------------------------------------

/// Target output shape. Determines the secondary usability predicate an
/// event must satisfy in addition to the search filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    /// Region (choropleth) output, no coordinate requirement.
    Region,
    /// Point-marker output — requires a begin coordinate.
    Markers,
    /// No shape-specific requirement.
    Any,
}

impl DataFormat {
    pub fn usable(&self, event: &StormEvent) -> bool {
        match self {
            DataFormat::Region | DataFormat::Any => true,
            DataFormat::Markers => event
                .fields
                .get("BEGIN_LAT")
                .is_some_and(|lat| !lat.trim().is_empty()),
        }
    }
}

impl FromStr for DataFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Region" => Ok(DataFormat::Region),
            "Markers" => Ok(DataFormat::Markers),
            "Any" => Ok(DataFormat::Any),
            other => Err(format!("unknown data format {:?}", other)),
        }
    }
}
