//! Unified application error type.
//! All modules (db, core, cli, utils) return AppError to keep the error
//! handling consistent and easy to manage. Shift validation failures are
//! carried as a tagged `ShiftError` so callers can render each case.

use std::fmt;
use std::io;
use thiserror::Error;

/// Why a position could not be obtained from the location provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationFailure {
    PermissionDenied,
    PositionUnavailable,
    Timeout,
    /// The request was superseded by a newer one (user retried or left).
    Cancelled,
}

impl LocationFailure {
    /// Only transient sensor failures are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LocationFailure::PositionUnavailable | LocationFailure::Timeout
        )
    }
}

impl fmt::Display for LocationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LocationFailure::PermissionDenied => "permission denied",
            LocationFailure::PositionUnavailable => "position unavailable",
            LocationFailure::Timeout => "timed out",
            LocationFailure::Cancelled => "request cancelled",
        };
        f.write_str(s)
    }
}

/// Lifecycle transitions that are not allowed in the current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidState {
    #[error("Already clocked in on this project (open entry #{entry_id})")]
    AlreadyClockedIn { entry_id: i64 },

    #[error("No open entry #{entry_id}")]
    NoOpenEntry { entry_id: i64 },

    #[error("Entry #{entry_id} belongs to another user")]
    NotOwner { entry_id: i64 },

    #[error("Not clocked in on project #{project_id}")]
    NotClockedIn { project_id: i64 },

    #[error("Unknown project #{0}")]
    UnknownProject(i64),

    #[error("End time must be later than start time")]
    EndNotAfterStart,
}

/// Outcome of a rejected shift start/stop.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShiftError {
    #[error("Location unavailable: {0}")]
    LocationUnavailable(LocationFailure),

    #[error("Out of range: {distance_meters:.0} m from site (allowed {radius_meters:.0} m)")]
    OutOfRange {
        distance_meters: f64,
        radius_meters: f64,
    },

    #[error("{0}")]
    InvalidState(#[from] InvalidState),

    #[error("Invalid project data: {0}")]
    Configuration(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("Corrupted record: {0}")]
    CorruptRecord(String),

    // ---------------------------
    // Parsing errors
    // ---------------------------
    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    #[error("Invalid lunch break: {0}")]
    InvalidLunch(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    // ---------------------------
    // Logic errors
    // ---------------------------
    #[error("{0}")]
    Shift(#[from] ShiftError),

    #[error("Project #{0} not found")]
    ProjectNotFound(i64),

    #[error("Project #{0} still has time entries and cannot be deleted")]
    ProjectInUse(i64),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<InvalidState> for AppError {
    fn from(e: InvalidState) -> Self {
        AppError::Shift(ShiftError::InvalidState(e))
    }
}

impl AppError {
    /// The shift validation outcome wrapped by this error, if any.
    pub fn as_shift(&self) -> Option<&ShiftError> {
        match self {
            AppError::Shift(e) => Some(e),
            _ => None,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
