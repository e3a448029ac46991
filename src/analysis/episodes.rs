/// Episode aggregation.
///
/// `EpisodeAggregator` folds the ordered sequence of retained events for one
/// year into episodes keyed by `EPISODE_ID`, so downstream consumers can ask
/// "what did this weather system do in total?" without re-grouping a flat
/// event list every time.
///
/// Two kinds of state are accumulated per episode:
///   - merged scalars: one copy of every non-loss field; the first event
///     seeds it, later events either agree or poison the field with the
///     `"(Multiple values)"` sentinel (irreversibly);
///   - loss totals: plain sums of the nine categories, so the totals over
///     all finalized episodes always equal the totals over all observed
///     events.

use std::collections::{BTreeMap, HashMap};

use crate::model::{Episode, LossFigures, StormEvent, MULTIPLE_VALUES, RAW_LOSS_COLUMNS};

// ---------------------------------------------------------------------------
// Scalar view
// ---------------------------------------------------------------------------

/// The fields of an event that participate in episode-level merging: every
/// pass-through column except the per-event identifier, the per-event
/// narrative (dropped at episode scope), and the loss columns (carried as
/// sums instead), plus the stringified UTC timestamps.
fn scalar_view(event: &StormEvent) -> BTreeMap<String, String> {
    let mut view = event.fields.clone();
    view.remove("EVENT_ID");
    view.remove("EVENT_NARRATIVE");
    for column in RAW_LOSS_COLUMNS {
        view.remove(column);
    }
    view.insert(
        "BEGIN_DATE_TIME_UTC".to_string(),
        event
            .begin_datetime_utc
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default(),
    );
    view.insert(
        "END_DATE_TIME_UTC".to_string(),
        event
            .end_datetime_utc
            .map(|dt| dt.to_rfc3339())
            .unwrap_or_default(),
    );
    view
}

// ---------------------------------------------------------------------------
// Aggregator
// ---------------------------------------------------------------------------

/// Incremental fold of retained events into episodes.
///
/// Observation order matters only for which event seeds each episode's
/// merged scalars and for the ordering of `event_ids`; the loss totals are
/// order-independent.
pub struct EpisodeAggregator {
    episodes: HashMap<String, Episode>,
    /// Episode ids in first-encounter order, for deterministic finalization.
    order: Vec<String>,
}

impl EpisodeAggregator {
    pub fn new() -> Self {
        Self {
            episodes: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Folds one event into its episode, seeding the episode if this is the
    /// first event observed with its id.
    pub fn observe(&mut self, event: &StormEvent) {
        match self.episodes.get_mut(&event.episode_id) {
            None => {
                self.order.push(event.episode_id.clone());
                self.episodes.insert(
                    event.episode_id.clone(),
                    Episode {
                        episode_id: event.episode_id.clone(),
                        event_ids: vec![event.event_id.clone()],
                        merged: scalar_view(event),
                        totals: event.losses.clone(),
                    },
                );
            }
            Some(episode) => {
                episode.event_ids.push(event.event_id.clone());
                for (key, value) in scalar_view(event) {
                    match episode.merged.get(&key) {
                        None => {
                            episode.merged.insert(key, value);
                        }
                        Some(current) if *current != value => {
                            // Once poisoned, a field stays poisoned: any
                            // later value differs from the sentinel too.
                            episode.merged.insert(key, MULTIPLE_VALUES.to_string());
                        }
                        Some(_) => {}
                    }
                }
                episode.totals.add(&event.losses);
            }
        }
    }

    /// Returns the finalized episodes in first-encounter order.
    pub fn finalize(mut self) -> Vec<Episode> {
        self.order
            .iter()
            .filter_map(|id| self.episodes.remove(id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }
}

impl Default for EpisodeAggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawRecord;
    use crate::normalize::normalize_record;

    fn retained_event(
        event_id: &str,
        episode_id: &str,
        state: &str,
        damage_property: &str,
    ) -> StormEvent {
        let record: RawRecord = [
            ("EVENT_ID", event_id),
            ("EPISODE_ID", episode_id),
            ("EVENT_TYPE", "Dust Storm"),
            ("STATE", state),
            ("CZ_TIMEZONE", "MST"),
            ("BEGIN_DATE_TIME", "28-APR-96 14:30:00"),
            ("END_DATE_TIME", "28-APR-96 15:00:00"),
            ("EVENT_NARRATIVE", "unique per-event text"),
            ("EPISODE_NARRATIVE", "shared episode text"),
            ("INJURIES_DIRECT", "1"),
            ("DAMAGE_PROPERTY", damage_property),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        normalize_record(record).expect("test record should normalize").0
    }

    #[test]
    fn test_first_event_seeds_episode() {
        let mut agg = EpisodeAggregator::new();
        agg.observe(&retained_event("1", "100", "ARIZONA", "5K"));
        let episodes = agg.finalize();

        assert_eq!(episodes.len(), 1);
        let ep = &episodes[0];
        assert_eq!(ep.episode_id, "100");
        assert_eq!(ep.event_ids, vec!["1"]);
        assert_eq!(ep.totals.damage_property, 5000.0);
        assert_eq!(ep.merged.get("STATE").unwrap(), "ARIZONA");
        // Per-event fields do not survive at episode scope.
        assert!(!ep.merged.contains_key("EVENT_ID"));
        assert!(!ep.merged.contains_key("EVENT_NARRATIVE"));
        assert!(!ep.merged.contains_key("DAMAGE_PROPERTY"));
    }

    #[test]
    fn test_agreeing_fields_stay_divergent_fields_poison() {
        let mut agg = EpisodeAggregator::new();
        agg.observe(&retained_event("1", "100", "ARIZONA", "5K"));
        agg.observe(&retained_event("2", "100", "NEW MEXICO", "1K"));
        let ep = agg.finalize().remove(0);

        assert_eq!(ep.event_ids, vec!["1", "2"]);
        assert_eq!(ep.merged.get("STATE").unwrap(), MULTIPLE_VALUES);
        assert_eq!(ep.merged.get("EPISODE_NARRATIVE").unwrap(), "shared episode text");
        assert_eq!(ep.totals.damage_property, 6000.0);
        assert_eq!(ep.totals.injuries_direct, 2.0);
    }

    #[test]
    fn test_sentinel_never_reverts() {
        let mut agg = EpisodeAggregator::new();
        agg.observe(&retained_event("1", "100", "ARIZONA", "0"));
        agg.observe(&retained_event("2", "100", "NEW MEXICO", "0"));
        // A third event agreeing with the first does not un-poison STATE.
        agg.observe(&retained_event("3", "100", "ARIZONA", "0"));
        let ep = agg.finalize().remove(0);
        assert_eq!(ep.merged.get("STATE").unwrap(), MULTIPLE_VALUES);
    }

    #[test]
    fn test_double_observation_is_scalar_idempotent_but_doubles_totals() {
        let event = retained_event("1", "100", "ARIZONA", "2.5K");
        let mut agg = EpisodeAggregator::new();
        agg.observe(&event);
        agg.observe(&event);
        let ep = agg.finalize().remove(0);

        // Merged scalars unchanged by the duplicate...
        assert_eq!(ep.merged.get("STATE").unwrap(), "ARIZONA");
        // ...but the loss totals are additive by design.
        assert_eq!(ep.totals.damage_property, 5000.0);
        assert_eq!(ep.event_ids, vec!["1", "1"]);
    }

    #[test]
    fn test_finalize_preserves_first_encounter_order() {
        let mut agg = EpisodeAggregator::new();
        agg.observe(&retained_event("1", "300", "ARIZONA", "0"));
        agg.observe(&retained_event("2", "100", "ARIZONA", "0"));
        agg.observe(&retained_event("3", "300", "ARIZONA", "0"));
        agg.observe(&retained_event("4", "200", "ARIZONA", "0"));
        let ids: Vec<_> = agg.finalize().into_iter().map(|e| e.episode_id).collect();
        assert_eq!(ids, vec!["300", "100", "200"]);
    }

    #[test]
    fn test_aggregation_is_loss_preserving() {
        let events = vec![
            retained_event("1", "100", "ARIZONA", "5K"),
            retained_event("2", "100", "ARIZONA", "1.5K"),
            retained_event("3", "200", "TEXAS", "2M"),
            retained_event("4", "300", "NEVADA", ""),
        ];

        let mut agg = EpisodeAggregator::new();
        let mut event_total = LossFigures::default();
        for event in &events {
            event_total.add(&event.losses);
            agg.observe(event);
        }

        let mut episode_total = LossFigures::default();
        for episode in agg.finalize() {
            episode_total.add(&episode.totals);
        }
        assert_eq!(episode_total, event_total);
    }
}
