use chrono::NaiveTime;

/// Parses an operating-hours string in `HH:MM-HH:MM` form.
/// Returns `None` when the format is wrong or start >= end.
pub fn parse_opening_hours(raw: &str) -> Option<(NaiveTime, NaiveTime)> {
    let (start_raw, end_raw) = raw.split_once('-')?;
    let start = NaiveTime::parse_from_str(start_raw.trim(), "%H:%M").ok()?;
    let end = NaiveTime::parse_from_str(end_raw.trim(), "%H:%M").ok()?;
    if start >= end {
        return None;
    }
    Some((start, end))
}

pub fn is_valid_opening_hours(raw: &str) -> bool {
    parse_opening_hours(raw).is_some()
}
