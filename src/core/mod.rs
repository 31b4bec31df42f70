pub mod backup;
pub mod calculator;
pub mod clock;
pub mod geofence;
pub mod location;
pub mod log;
pub mod project;
pub mod shift;
