//! Geofence check: is an observed position close enough to a project site?

use crate::errors::ShiftError;
use crate::models::coordinate::Coordinate;

/// Mean Earth radius used by the spherical approximation.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Result of a geofence evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeCheck {
    pub allowed: bool,
    pub distance_meters: f64,
}

/// Great-circle distance between two points (Haversine formula).
pub fn haversine_distance(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);

    // clamp: rounding can push h slightly above 1 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_METERS * c
}

/// Decide whether `observed` lies within `radius_meters` of `target`.
///
/// The threshold is inclusive. A negative or non-finite radius is bad admin
/// data and is reported as a configuration error.
pub fn is_within_range(
    observed: &Coordinate,
    target: &Coordinate,
    radius_meters: f64,
) -> Result<RangeCheck, ShiftError> {
    if !radius_meters.is_finite() || radius_meters < 0.0 {
        return Err(ShiftError::Configuration(format!(
            "allowed radius must be a non-negative number of meters, got {}",
            radius_meters
        )));
    }

    let distance_meters = haversine_distance(observed, target);

    Ok(RangeCheck {
        allowed: distance_meters <= radius_meters,
        distance_meters,
    })
}

/// Same as [`is_within_range`] but turns a rejection into `OutOfRange`.
pub fn require_within_range(
    observed: &Coordinate,
    target: &Coordinate,
    radius_meters: f64,
) -> Result<RangeCheck, ShiftError> {
    let check = is_within_range(observed, target, radius_meters)?;
    if !check.allowed {
        return Err(ShiftError::OutOfRange {
            distance_meters: check.distance_meters,
            radius_meters,
        });
    }
    Ok(check)
}
