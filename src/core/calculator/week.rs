//! Monday-anchored weekly aggregation of closed shifts.

use crate::models::time_entry::TimeEntry;
use crate::models::week_summary::{DailyTotal, WeekSummary};
use chrono::{Datelike, Days, NaiveDate};

/// Monday of the week containing `date`.
pub fn week_monday(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as u64;
    date - Days::new(offset)
}

/// The seven calendar days starting at `week_start`.
pub fn week_days(week_start: NaiveDate) -> Vec<NaiveDate> {
    week_start.iter_days().take(7).collect()
}

/// Bucket net worked minutes by the local day each shift started on.
///
/// Open entries are counted in `entries` but contribute no minutes; entries
/// that started outside the week are ignored.
pub fn aggregate_by_day(entries: &[TimeEntry], week_start: NaiveDate) -> WeekSummary {
    let mut days: Vec<DailyTotal> = week_days(week_start)
        .into_iter()
        .map(|date| DailyTotal {
            date,
            minutes: 0,
            entries: 0,
        })
        .collect();

    for entry in entries {
        let offset = (entry.work_date() - week_start).num_days();
        if !(0..7).contains(&offset) {
            continue;
        }

        let day = &mut days[offset as usize];
        day.minutes += entry.worked_minutes();
        day.entries += 1;
    }

    let total_minutes = days.iter().map(|d| d.minutes).sum();

    WeekSummary {
        week_start,
        days,
        total_minutes,
    }
}
