use super::coordinate::Coordinate;
use crate::errors::ShiftError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Project {
    pub id: i64,                    // ⇔ projects.id
    pub name: String,               // ⇔ projects.name
    pub location: Coordinate,       // ⇔ projects.latitude / projects.longitude
    pub allowed_radius_meters: f64, // ⇔ projects.radius_meters
    pub lunch_minutes: i64,         // ⇔ projects.lunch_minutes
}

impl Project {
    /// Project not yet stored (`id = 0`, assigned on insert).
    pub fn new(
        name: &str,
        location: Coordinate,
        allowed_radius_meters: f64,
        lunch_minutes: i64,
    ) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            location,
            allowed_radius_meters,
            lunch_minutes,
        }
    }

    /// Reject admin data the geofence and duration code cannot work with.
    pub fn validate(&self) -> Result<(), ShiftError> {
        if self.name.trim().is_empty() {
            return Err(ShiftError::Configuration(
                "project name must not be empty".into(),
            ));
        }
        self.location.validate()?;
        if !self.allowed_radius_meters.is_finite() || self.allowed_radius_meters < 0.0 {
            return Err(ShiftError::Configuration(format!(
                "allowed radius must be a non-negative number of meters, got {}",
                self.allowed_radius_meters
            )));
        }
        if self.lunch_minutes < 0 {
            return Err(ShiftError::Configuration(format!(
                "lunch minutes must not be negative, got {}",
                self.lunch_minutes
            )));
        }
        Ok(())
    }
}
