/// Data aggregation for the dust storm-event pipeline.
///
/// Submodules:
/// - `episodes` — folds retained events into episodes keyed by episode id,
///   merging scalar fields and summing loss totals.

pub mod episodes;
