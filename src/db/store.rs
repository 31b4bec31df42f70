//! Collaborator interfaces the shift lifecycle talks to, with their SQLite
//! implementation on top of [`DbPool`].

use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::AppResult;
use crate::models::project::Project;
use crate::models::time_entry::TimeEntry;
use chrono::NaiveDate;

/// Read-only lookup of project site data.
pub trait ProjectDirectory {
    fn find_project(&self, id: i64) -> AppResult<Option<Project>>;
}

/// Persistence of time entries.
pub trait EntryStore {
    /// Store a new entry and return it with its assigned id.
    fn create_entry(&mut self, entry: &TimeEntry) -> AppResult<TimeEntry>;

    fn update_entry(&mut self, entry: &TimeEntry) -> AppResult<()>;

    fn find_entry(&self, id: i64) -> AppResult<Option<TimeEntry>>;

    fn find_open_entry(&self, user_id: &str, project_id: i64) -> AppResult<Option<TimeEntry>>;

    fn open_entries(&self, user_id: &str) -> AppResult<Vec<TimeEntry>>;

    /// Entries whose local start date lies in `[from, to)`.
    fn entries_between(
        &self,
        user_id: &str,
        project_id: Option<i64>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<TimeEntry>>;
}

impl ProjectDirectory for DbPool {
    fn find_project(&self, id: i64) -> AppResult<Option<Project>> {
        queries::load_project(&self.conn, id)
    }
}

impl EntryStore for DbPool {
    fn create_entry(&mut self, entry: &TimeEntry) -> AppResult<TimeEntry> {
        let id = queries::insert_entry(&self.conn, entry)?;
        Ok(TimeEntry {
            id,
            ..entry.clone()
        })
    }

    fn update_entry(&mut self, entry: &TimeEntry) -> AppResult<()> {
        queries::update_entry(&self.conn, entry)
    }

    fn find_entry(&self, id: i64) -> AppResult<Option<TimeEntry>> {
        queries::load_entry(&self.conn, id)
    }

    fn find_open_entry(&self, user_id: &str, project_id: i64) -> AppResult<Option<TimeEntry>> {
        queries::load_open_entry(&self.conn, user_id, project_id)
    }

    fn open_entries(&self, user_id: &str) -> AppResult<Vec<TimeEntry>> {
        queries::load_open_entries(&self.conn, user_id)
    }

    fn entries_between(
        &self,
        user_id: &str,
        project_id: Option<i64>,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<TimeEntry>> {
        queries::load_entries_between(&self.conn, user_id, project_id, from, to)
    }
}
