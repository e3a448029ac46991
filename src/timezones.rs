/// Time-zone registry for the dust storm-event pipeline.
///
/// Storm-event records carry their local times with a `CZ_TIMEZONE` code.
/// Most entries use plain abbreviations (CST, EST, ...) but some years
/// hyphenate them (e.g. `AKST-9` in the 2006 data); only the piece before
/// the first hyphen identifies the zone. The databases always record
/// standard time, so each code maps to a single fixed UTC offset and no
/// daylight-saving rules apply.
///
/// This is the single source of truth for offsets: all other modules
/// should look zones up here rather than hardcoding offsets.
///
/// Zone types
///   - CONT: Contiguous U.S. states
///   - NCNT: Non-contiguous U.S. states
///   - TERR: U.S. territories
///
/// +----------+--------+------+----------------------+
/// |   Zone   |  Code  | Type | Standard UTC offset  |
/// +----------+--------+------+----------------------+
/// | Alaska   | AKST   | NCNT | -0900                |
/// | Atlantic | AST    | TERR | -0400                |
/// | Central  | CST    | CONT | -0600                |
/// | Eastern  | EST    | CONT | -0500                |
/// | Hawaii   | HST    | NCNT | -1000                |
/// | Mountain | MST    | CONT | -0700                |
/// | Pacific  | PST    | CONT | -0800                |
/// | Samoa    | SST    | TERR | +1300                |
/// | Guam     | GST10  | TERR | +1000                |
/// +----------+--------+------+----------------------+
///
/// The SST and GST10 offsets are taken verbatim from the source data's
/// documentation even though they disagree with the IANA zones for those
/// territories; see DESIGN.md for the inherited-data-risk note.

/// Code → standard-time UTC offset in whole hours.
pub static TIME_ZONE_OFFSETS: &[(&str, i32)] = &[
    ("AKST", -9),
    ("AST", -4),
    ("CST", -6),
    ("EST", -5),
    ("HST", -10),
    ("MST", -7),
    ("PST", -8),
    ("SST", 13),
    ("GST10", 10),
];

/// Resolves a raw `CZ_TIMEZONE` value to its standard-time UTC offset.
///
/// Splits on `-` first so hyphenated forms such as `"AKST-9"` resolve via
/// the `"AKST"` prefix (the numeric suffix is never interpreted). Returns
/// `None` for unrecognized codes; the caller decides how to degrade.
pub fn utc_offset_hours(raw_zone: &str) -> Option<i32> {
    let code = raw_zone.trim().split('-').next().unwrap_or("");
    TIME_ZONE_OFFSETS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, offset)| *offset)
}
