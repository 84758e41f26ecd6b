//! Base-time resolution. A stream's base time is a wall-clock "HH:MM" in the
//! schedule's authoring zone; each slot shows that instant in its own zone,
//! resolved against *today* so DST transitions are reflected the day they
//! happen. Nothing here is cached: every call re-derives from the clock.

use chrono::{DateTime, LocalResult, TimeZone, Utc};
use chrono_tz::Tz;

/// Shown wherever a time cannot be resolved.
pub const TIME_PLACEHOLDER: &str = "--:--";

/// Strict "HH:MM" (0-23 / 0-59), surrounding whitespace tolerated.
pub fn parse_base_time(value: &str) -> Option<(u32, u32)> {
    let trimmed = value.trim();
    let (h, m) = trimmed.split_once(':')?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return None;
    }
    if !h.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hours: u32 = h.parse().ok()?;
    let minutes: u32 = m.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some((hours, minutes))
}

/// Resolves a base time authored in `schedule_zone` into a 12-hour clock
/// string in `target_zone`, using today's date in the schedule zone.
/// `None` on malformed input or unknown zone ids; callers substitute
/// [`TIME_PLACEHOLDER`].
pub fn resolve_slot_time(base_time: &str, schedule_zone: &str, target_zone: &str) -> Option<String> {
    resolve_slot_time_at(Utc::now(), base_time, schedule_zone, target_zone)
}

/// Deterministic seam for [`resolve_slot_time`].
pub fn resolve_slot_time_at(
    now: DateTime<Utc>,
    base_time: &str,
    schedule_zone: &str,
    target_zone: &str,
) -> Option<String> {
    let (hours, minutes) = parse_base_time(base_time)?;
    let schedule_tz: Tz = schedule_zone.parse().ok()?;
    let target_tz: Tz = target_zone.parse().ok()?;

    let today = now.with_timezone(&schedule_tz).date_naive();
    let naive = today.and_hms_opt(hours, minutes, 0)?;
    let instant = match schedule_tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        // Fall-back transition: the earlier of the two mappings wins.
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // Spring-forward gap: read the naive time as UTC.
        LocalResult::None => Utc.from_utc_datetime(&naive),
    };

    Some(format_12h(&instant.with_timezone(&target_tz)))
}

fn format_12h<Z: TimeZone>(dt: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    dt.format("%-I:%M %p").to_string()
}
