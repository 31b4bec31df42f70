//! Project administration: site location, allowed radius and lunch policy.

use crate::db::pool::DbPool;
use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::Coordinate;
use crate::models::project::Project;

/// Fields to change on an existing project; `None` keeps the current value.
#[derive(Debug, Default, Clone)]
pub struct ProjectChanges {
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_meters: Option<f64>,
    pub lunch_minutes: Option<i64>,
}

impl ProjectChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.radius_meters.is_none()
            && self.lunch_minutes.is_none()
    }

    fn apply_to(&self, p: &mut Project) {
        if let Some(name) = &self.name {
            p.name = name.trim().to_string();
        }
        if let Some(lat) = self.latitude {
            p.location.latitude = lat;
        }
        if let Some(lon) = self.longitude {
            p.location.longitude = lon;
        }
        if let Some(r) = self.radius_meters {
            p.allowed_radius_meters = r;
        }
        if let Some(l) = self.lunch_minutes {
            p.lunch_minutes = l;
        }
    }
}

pub struct ProjectLogic;

impl ProjectLogic {
    pub fn add(
        pool: &mut DbPool,
        name: &str,
        location: Coordinate,
        radius_meters: f64,
        lunch_minutes: i64,
    ) -> AppResult<Project> {
        let mut project = Project::new(name, location, radius_meters, lunch_minutes);
        project.validate()?;

        project.id = queries::insert_project(&pool.conn, &project)?;
        Ok(project)
    }

    pub fn edit(pool: &mut DbPool, id: i64, changes: &ProjectChanges) -> AppResult<Project> {
        let mut project = Self::get(pool, id)?;

        if changes.is_empty() {
            return Err(AppError::Config(
                "Nothing to do: specify at least one field to change.".into(),
            ));
        }

        changes.apply_to(&mut project);
        project.validate()?;

        queries::update_project(&pool.conn, &project)?;
        Ok(project)
    }

    /// Remove a project nobody has clocked on.
    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<Project> {
        let project = Self::get(pool, id)?;

        if queries::count_entries_for_project(&pool.conn, id)? > 0 {
            return Err(AppError::ProjectInUse(id));
        }

        queries::delete_project(&pool.conn, id)?;
        Ok(project)
    }

    pub fn get(pool: &mut DbPool, id: i64) -> AppResult<Project> {
        queries::load_project(&pool.conn, id)?.ok_or(AppError::ProjectNotFound(id))
    }

    pub fn list(pool: &mut DbPool) -> AppResult<Vec<Project>> {
        queries::load_projects(&pool.conn)
    }
}
