//! Worked-time arithmetic for single shifts.

use chrono::{DateTime, TimeZone};

/// Whole minutes from `start` to `end` (truncating, negative if reversed).
pub fn minutes_between<Tz: TimeZone>(end: DateTime<Tz>, start: DateTime<Tz>) -> i64 {
    (end - start).num_minutes()
}

/// Net worked minutes for one shift after the lunch deduction, never negative.
pub fn worked_minutes<Tz: TimeZone>(start: DateTime<Tz>, end: DateTime<Tz>, lunch_minutes: i64) -> i64 {
    let raw = minutes_between(end, start);
    (raw - lunch_minutes).max(0)
}

/// Time elapsed on a shift that is still open. Display only, no lunch deduction.
pub fn elapsed_minutes<Tz: TimeZone>(start: DateTime<Tz>, now: DateTime<Tz>) -> i64 {
    minutes_between(now, start).max(0)
}

/// `H:MM` with unpadded hours, e.g. `125 → "2:05"`, `3360 → "56:00"`.
pub fn format_hours_minutes(total_minutes: i64) -> String {
    let sign = if total_minutes < 0 { "-" } else { "" };
    let m = total_minutes.unsigned_abs();
    format!("{}{}:{:02}", sign, m / 60, m % 60)
}
