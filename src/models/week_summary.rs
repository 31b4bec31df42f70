use crate::core::calculator::duration::format_hours_minutes;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub minutes: i64,
    pub entries: usize,
}

impl DailyTotal {
    pub fn formatted(&self) -> String {
        format_hours_minutes(self.minutes)
    }
}

/// Per-day worked minutes for the seven days starting at `week_start`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekSummary {
    pub week_start: NaiveDate,
    pub days: Vec<DailyTotal>,
    pub total_minutes: i64,
}

impl WeekSummary {
    pub fn total_formatted(&self) -> String {
        format_hours_minutes(self.total_minutes)
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DailyTotal> {
        self.days.iter().find(|d| d.date == date)
    }
}
