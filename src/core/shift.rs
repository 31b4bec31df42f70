//! Shift lifecycle: `NoActiveEntry → Open → Closed`.
//!
//! Both transitions re-run the geofence against the project's registered
//! site, so a shift can only be closed from where it can be opened.

use crate::core::clock::Clock;
use crate::core::geofence::{RangeCheck, require_within_range};
use crate::core::location::{LocationProvider, Locator};
use crate::db::store::{EntryStore, ProjectDirectory};
use crate::errors::{AppResult, InvalidState};
use crate::models::coordinate::Coordinate;
use crate::models::project::Project;
use crate::models::time_entry::TimeEntry;

/// What a successful transition produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftOutcome {
    pub entry: TimeEntry,
    pub project: Project,
    pub range: RangeCheck,
}

pub struct ShiftLogic<'a, S, C> {
    store: &'a mut S,
    clock: &'a C,
}

impl<'a, S, C> ShiftLogic<'a, S, C>
where
    S: EntryStore + ProjectDirectory,
    C: Clock,
{
    pub fn new(store: &'a mut S, clock: &'a C) -> Self {
        Self { store, clock }
    }

    fn project(&self, project_id: i64) -> AppResult<Project> {
        let project = self
            .store
            .find_project(project_id)?
            .ok_or(InvalidState::UnknownProject(project_id))?;
        project.validate()?;
        Ok(project)
    }

    /// Open a shift for `(user_id, project_id)` at the observed position.
    ///
    /// `lunch_minutes` overrides the project's lunch allowance when given.
    pub fn start(
        &mut self,
        user_id: &str,
        project_id: i64,
        observed: Coordinate,
        lunch_minutes: Option<i64>,
    ) -> AppResult<ShiftOutcome> {
        let project = self.project(project_id)?;

        if let Some(open) = self.store.find_open_entry(user_id, project_id)? {
            return Err(InvalidState::AlreadyClockedIn { entry_id: open.id }.into());
        }

        let range = require_within_range(
            &observed,
            &project.location,
            project.allowed_radius_meters,
        )?;

        let lunch = lunch_minutes.unwrap_or(project.lunch_minutes).max(0);
        let draft = TimeEntry::open(user_id, project_id, self.clock.now(), lunch, observed);
        let entry = self.store.create_entry(&draft)?;

        Ok(ShiftOutcome {
            entry,
            project,
            range,
        })
    }

    /// Close `user_id`'s open shift at the observed position.
    pub fn stop(
        &mut self,
        user_id: &str,
        entry_id: i64,
        observed: Coordinate,
    ) -> AppResult<ShiftOutcome> {
        let mut entry = self
            .store
            .find_entry(entry_id)?
            .filter(TimeEntry::is_open)
            .ok_or(InvalidState::NoOpenEntry { entry_id })?;

        if entry.user_id != user_id {
            return Err(InvalidState::NotOwner { entry_id }.into());
        }

        let project = self.project(entry.project_id)?;

        let range = require_within_range(
            &observed,
            &project.location,
            project.allowed_radius_meters,
        )?;

        let now = self.clock.now();
        if now <= entry.start_time {
            return Err(InvalidState::EndNotAfterStart.into());
        }

        entry.end_time = Some(now);
        entry.end_location = Some(observed);
        self.store.update_entry(&entry)?;

        Ok(ShiftOutcome {
            entry,
            project,
            range,
        })
    }

    /// Acquire a position, then [`start`](Self::start).
    pub fn start_shift<P: LocationProvider>(
        &mut self,
        user_id: &str,
        project_id: i64,
        locator: &mut Locator<P>,
        lunch_minutes: Option<i64>,
    ) -> AppResult<ShiftOutcome> {
        let observed = locator.locate()?;
        self.start(user_id, project_id, observed, lunch_minutes)
    }

    /// Acquire a position, then [`stop`](Self::stop).
    pub fn stop_shift<P: LocationProvider>(
        &mut self,
        user_id: &str,
        entry_id: i64,
        locator: &mut Locator<P>,
    ) -> AppResult<ShiftOutcome> {
        let observed = locator.locate()?;
        self.stop(user_id, entry_id, observed)
    }

    /// Resolve the open entry of `(user_id, project_id)`.
    pub fn open_entry_id(&self, user_id: &str, project_id: i64) -> AppResult<i64> {
        self.store
            .find_open_entry(user_id, project_id)?
            .map(|e| e.id)
            .ok_or_else(|| InvalidState::NotClockedIn { project_id }.into())
    }
}
