//! Position acquisition: provider seam, bounded retry with backoff,
//! per-attempt timeout and invalidation of stale requests.

use crate::errors::{LocationFailure, ShiftError};
use crate::models::coordinate::Coordinate;
use crate::models::location::PositionFix;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

/// Anything that can report where the device currently is.
pub trait LocationProvider {
    /// Obtain one fix, giving up after roughly `timeout`.
    fn current_position(&mut self, timeout: Duration) -> Result<PositionFix, LocationFailure>;
}

impl<P: LocationProvider + ?Sized> LocationProvider for Box<P> {
    fn current_position(&mut self, timeout: Duration) -> Result<PositionFix, LocationFailure> {
        (**self).current_position(timeout)
    }
}

/// Position typed in by the user (`--lat/--lon`). Missing means no signal.
#[derive(Debug, Clone, Copy)]
pub struct StaticProvider {
    fix: Option<PositionFix>,
}

impl StaticProvider {
    pub fn new(fix: Option<PositionFix>) -> Self {
        Self { fix }
    }
}

impl LocationProvider for StaticProvider {
    fn current_position(&mut self, _timeout: Duration) -> Result<PositionFix, LocationFailure> {
        self.fix.ok_or(LocationFailure::PositionUnavailable)
    }
}

/// Reads the latest fix a GPS daemon drops into a JSON file:
/// `{"latitude": 45.1, "longitude": 9.2, "accuracy": 12.0}`.
///
/// The file is re-read on every attempt so a retry can pick up a fresh fix.
#[derive(Debug, Clone)]
pub struct FileProvider {
    path: PathBuf,
}

impl FileProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl LocationProvider for FileProvider {
    fn current_position(&mut self, _timeout: Duration) -> Result<PositionFix, LocationFailure> {
        let raw = fs::read_to_string(&self.path).map_err(|e| match e.kind() {
            ErrorKind::PermissionDenied => LocationFailure::PermissionDenied,
            _ => LocationFailure::PositionUnavailable,
        })?;

        let fix: PositionFix =
            serde_json::from_str(&raw).map_err(|_| LocationFailure::PositionUnavailable)?;

        fix.coordinate
            .validate()
            .map_err(|_| LocationFailure::PositionUnavailable)?;

        Ok(fix)
    }
}

/// Delay between two attempts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Backoff {
    Fixed(Duration),
    Exponential { initial: Duration, max: Duration },
}

impl Backoff {
    /// Delay after the given failed attempt (1-based).
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Fixed(d) => d,
            Backoff::Exponential { initial, max } => {
                let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
                initial.saturating_mul(factor).min(max)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub timeout: Duration,
    pub backoff: Backoff,
    /// Fixes reporting a worse accuracy are treated as no fix at all.
    pub max_accuracy_meters: Option<f64>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            timeout: Duration::from_secs(10),
            backoff: Backoff::Exponential {
                initial: Duration::from_millis(500),
                max: Duration::from_secs(4),
            },
            max_accuracy_meters: None,
        }
    }
}

/// Issues request tickets; invalidating bumps the generation so every
/// ticket handed out before becomes stale.
#[derive(Debug, Clone, Default)]
pub struct LocationRequests {
    generation: Arc<AtomicU64>,
}

impl LocationRequests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> RequestTicket {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        RequestTicket {
            generation,
            current: Arc::clone(&self.generation),
        }
    }

    /// Drop any in-flight request (user retried or navigated away).
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone)]
pub struct RequestTicket {
    generation: u64,
    current: Arc<AtomicU64>,
}

impl RequestTicket {
    pub fn is_current(&self) -> bool {
        self.current.load(Ordering::SeqCst) == self.generation
    }
}

/// Run the retry loop, sleeping through `sleep` between attempts.
pub fn acquire_with<F>(
    provider: &mut dyn LocationProvider,
    policy: &RetryPolicy,
    ticket: &RequestTicket,
    mut sleep: F,
) -> Result<PositionFix, LocationFailure>
where
    F: FnMut(Duration),
{
    let attempts = policy.max_attempts.max(1);
    let mut last = LocationFailure::PositionUnavailable;

    for attempt in 1..=attempts {
        if !ticket.is_current() {
            return Err(LocationFailure::Cancelled);
        }

        let started = Instant::now();
        let outcome = provider
            .current_position(policy.timeout)
            .and_then(|fix| {
                if started.elapsed() > policy.timeout {
                    return Err(LocationFailure::Timeout);
                }
                match (policy.max_accuracy_meters, fix.accuracy_meters) {
                    (Some(limit), Some(acc)) if acc > limit => {
                        Err(LocationFailure::PositionUnavailable)
                    }
                    _ => Ok(fix),
                }
            });

        // a newer request owns the result now
        if !ticket.is_current() {
            return Err(LocationFailure::Cancelled);
        }

        match outcome {
            Ok(fix) => return Ok(fix),
            Err(failure) if !failure.is_retryable() => return Err(failure),
            Err(failure) => last = failure,
        }

        if attempt < attempts {
            sleep(policy.backoff.delay(attempt));
        }
    }

    Err(last)
}

/// Provider, retry policy and request tracking bundled for the shift lifecycle.
pub struct Locator<P: LocationProvider> {
    provider: P,
    policy: RetryPolicy,
    requests: LocationRequests,
    sleep: fn(Duration),
}

impl<P: LocationProvider> Locator<P> {
    pub fn new(provider: P, policy: RetryPolicy) -> Self {
        Self {
            provider,
            policy,
            requests: LocationRequests::new(),
            sleep: thread::sleep,
        }
    }

    /// Replace the sleeper used between attempts.
    pub fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn locate_fix(&mut self) -> Result<PositionFix, ShiftError> {
        let ticket = self.requests.begin();
        acquire_with(&mut self.provider, &self.policy, &ticket, self.sleep)
            .map_err(ShiftError::LocationUnavailable)
    }

    pub fn locate(&mut self) -> Result<Coordinate, ShiftError> {
        self.locate_fix().map(|fix| fix.coordinate)
    }
}
