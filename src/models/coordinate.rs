use crate::errors::ShiftError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A WGS84 point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Build a coordinate, rejecting values outside [-90,90] x [-180,180] (and NaN).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ShiftError> {
        let c = Self {
            latitude,
            longitude,
        };
        c.validate()?;
        Ok(c)
    }

    pub fn validate(&self) -> Result<(), ShiftError> {
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ShiftError::Configuration(format!(
                "latitude {} is outside [-90, 90]",
                self.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ShiftError::Configuration(format!(
                "longitude {} is outside [-180, 180]",
                self.longitude
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
