//! Project-specific utilities live here.

use time::OffsetDateTime;

/// Milliseconds since the Unix epoch, clamped to zero for clocks set before it.
pub fn now_millis() -> u64 {
    let millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    u64::try_from(millis).unwrap_or_default()
}

/// Trim form input, treating blank text as absent.
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}
