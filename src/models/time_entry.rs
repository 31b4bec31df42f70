use super::coordinate::Coordinate;
use crate::core::calculator::duration::{elapsed_minutes, worked_minutes};
use chrono::{DateTime, Local, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EntryState {
    Open,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEntry {
    pub id: i64,                           // ⇔ time_entries.id
    pub user_id: String,                   // ⇔ time_entries.user_id
    pub project_id: i64,                   // ⇔ time_entries.project_id
    pub start_time: DateTime<Local>,       // ⇔ time_entries.start_time (RFC 3339)
    pub end_time: Option<DateTime<Local>>, // ⇔ time_entries.end_time (NULL while open)
    pub lunch_minutes: i64,                // ⇔ time_entries.lunch_minutes
    pub start_location: Coordinate,        // ⇔ time_entries.start_lat / start_lon
    pub end_location: Option<Coordinate>,  // ⇔ time_entries.end_lat / end_lon
}

impl TimeEntry {
    /// Open entry not yet stored (`id = 0`, assigned on insert).
    pub fn open(
        user_id: &str,
        project_id: i64,
        start_time: DateTime<Local>,
        lunch_minutes: i64,
        start_location: Coordinate,
    ) -> Self {
        Self {
            id: 0,
            user_id: user_id.to_string(),
            project_id,
            start_time,
            end_time: None,
            lunch_minutes,
            start_location,
            end_location: None,
        }
    }

    pub fn state(&self) -> EntryState {
        if self.end_time.is_some() {
            EntryState::Closed
        } else {
            EntryState::Open
        }
    }

    pub fn is_open(&self) -> bool {
        self.state() == EntryState::Open
    }

    /// Local calendar day the shift is booked on.
    pub fn work_date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }

    /// Net worked minutes; open entries count as zero.
    pub fn worked_minutes(&self) -> i64 {
        match self.end_time {
            Some(end) => worked_minutes(self.start_time, end, self.lunch_minutes),
            None => 0,
        }
    }

    /// Live "elapsed so far" for an open shift, without lunch deduction.
    pub fn elapsed_minutes(&self, now: DateTime<Local>) -> i64 {
        elapsed_minutes(self.start_time, now)
    }
}
