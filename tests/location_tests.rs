use rshiftlog::core::location::{
    Backoff, FileProvider, LocationProvider, LocationRequests, Locator, RetryPolicy, acquire_with,
};
use rshiftlog::errors::{LocationFailure, ShiftError};
use rshiftlog::models::coordinate::Coordinate;
use rshiftlog::models::location::PositionFix;
use std::collections::VecDeque;
use std::fs;
use std::thread;
use std::time::Duration;

mod common;
use common::temp_out;

/// Replays a fixed list of outcomes, one per call.
struct Scripted {
    outcomes: VecDeque<Result<PositionFix, LocationFailure>>,
    calls: u32,
}

impl Scripted {
    fn new(outcomes: Vec<Result<PositionFix, LocationFailure>>) -> Self {
        Self {
            outcomes: outcomes.into(),
            calls: 0,
        }
    }
}

impl LocationProvider for Scripted {
    fn current_position(&mut self, _timeout: Duration) -> Result<PositionFix, LocationFailure> {
        self.calls += 1;
        self.outcomes
            .pop_front()
            .unwrap_or(Err(LocationFailure::PositionUnavailable))
    }
}

fn fix(accuracy: Option<f64>) -> PositionFix {
    PositionFix::new(Coordinate::new(45.0, 9.0).unwrap(), accuracy)
}

fn policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        timeout: Duration::from_secs(5),
        backoff: Backoff::Exponential {
            initial: Duration::from_millis(100),
            max: Duration::from_millis(300),
        },
        max_accuracy_meters: None,
    }
}

#[test]
fn test_backoff_delays() {
    let exp = Backoff::Exponential {
        initial: Duration::from_millis(500),
        max: Duration::from_secs(4),
    };
    assert_eq!(exp.delay(1), Duration::from_millis(500));
    assert_eq!(exp.delay(2), Duration::from_millis(1000));
    assert_eq!(exp.delay(4), Duration::from_millis(4000));
    assert_eq!(exp.delay(10), Duration::from_secs(4));

    let fixed = Backoff::Fixed(Duration::from_millis(250));
    assert_eq!(fixed.delay(1), fixed.delay(7));
}

#[test]
fn test_retries_transient_failures_then_succeeds() {
    let mut provider = Scripted::new(vec![
        Err(LocationFailure::Timeout),
        Err(LocationFailure::PositionUnavailable),
        Ok(fix(Some(10.0))),
    ]);
    let requests = LocationRequests::new();
    let mut slept = Vec::new();

    let got = acquire_with(&mut provider, &policy(3), &requests.begin(), |d| slept.push(d)).unwrap();

    assert_eq!(got, fix(Some(10.0)));
    assert_eq!(provider.calls, 3);
    assert_eq!(
        slept,
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[test]
fn test_gives_up_after_max_attempts_with_last_failure() {
    let mut provider = Scripted::new(vec![
        Err(LocationFailure::PositionUnavailable),
        Err(LocationFailure::PositionUnavailable),
        Err(LocationFailure::Timeout),
        Ok(fix(None)),
    ]);
    let requests = LocationRequests::new();
    let mut slept = Vec::new();

    let err = acquire_with(&mut provider, &policy(3), &requests.begin(), |d| slept.push(d)).unwrap_err();

    assert_eq!(err, LocationFailure::Timeout);
    assert_eq!(provider.calls, 3);
    // no sleep after the final attempt
    assert_eq!(slept.len(), 2);
}

#[test]
fn test_permission_denied_is_not_retried() {
    let mut provider = Scripted::new(vec![Err(LocationFailure::PermissionDenied), Ok(fix(None))]);
    let requests = LocationRequests::new();

    let err = acquire_with(&mut provider, &policy(5), &requests.begin(), |_| {}).unwrap_err();

    assert_eq!(err, LocationFailure::PermissionDenied);
    assert_eq!(provider.calls, 1);
}

#[test]
fn test_inaccurate_fix_is_rejected() {
    let mut provider = Scripted::new(vec![Ok(fix(Some(250.0))), Ok(fix(Some(30.0)))]);
    let requests = LocationRequests::new();
    let p = RetryPolicy {
        max_accuracy_meters: Some(50.0),
        ..policy(2)
    };

    let got = acquire_with(&mut provider, &p, &requests.begin(), |_| {}).unwrap();
    assert_eq!(got.accuracy_meters, Some(30.0));

    let mut provider = Scripted::new(vec![Ok(fix(Some(250.0)))]);
    let err = acquire_with(&mut provider, &RetryPolicy { max_attempts: 1, ..p }, &requests.begin(), |_| {})
        .unwrap_err();
    assert_eq!(err, LocationFailure::PositionUnavailable);
}

#[test]
fn test_slow_fix_counts_as_timeout() {
    struct Slow;
    impl LocationProvider for Slow {
        fn current_position(&mut self, _timeout: Duration) -> Result<PositionFix, LocationFailure> {
            thread::sleep(Duration::from_millis(30));
            Ok(fix(None))
        }
    }

    let requests = LocationRequests::new();
    let p = RetryPolicy {
        timeout: Duration::from_millis(5),
        ..policy(1)
    };

    let err = acquire_with(&mut Slow, &p, &requests.begin(), |_| {}).unwrap_err();
    assert_eq!(err, LocationFailure::Timeout);
}

#[test]
fn test_invalidated_request_is_cancelled() {
    /// Simulates the user retrying while the first request is in flight.
    struct Superseded {
        requests: LocationRequests,
    }
    impl LocationProvider for Superseded {
        fn current_position(&mut self, _timeout: Duration) -> Result<PositionFix, LocationFailure> {
            self.requests.invalidate();
            Ok(fix(None))
        }
    }

    let requests = LocationRequests::new();
    let ticket = requests.begin();
    let mut provider = Superseded {
        requests: requests.clone(),
    };

    let err = acquire_with(&mut provider, &policy(3), &ticket, |_| {}).unwrap_err();
    assert_eq!(err, LocationFailure::Cancelled);
    assert!(!ticket.is_current());

    // a stale ticket never reaches the provider
    let mut scripted = Scripted::new(vec![Ok(fix(None))]);
    let err = acquire_with(&mut scripted, &policy(3), &ticket, |_| {}).unwrap_err();
    assert_eq!(err, LocationFailure::Cancelled);
    assert_eq!(scripted.calls, 0);
}

#[test]
fn test_new_request_supersedes_old_ticket() {
    let requests = LocationRequests::new();
    let first = requests.begin();
    assert!(first.is_current());

    let second = requests.begin();
    assert!(!first.is_current());
    assert!(second.is_current());
}

#[test]
fn test_locator_maps_failure_to_location_unavailable() {
    let provider = Scripted::new(vec![Err(LocationFailure::PermissionDenied)]);
    let mut locator = Locator::new(provider, policy(3)).with_sleep(|_| {});

    assert_eq!(
        locator.locate(),
        Err(ShiftError::LocationUnavailable(LocationFailure::PermissionDenied))
    );
}

#[test]
fn test_file_provider_reads_fix() {
    let path = temp_out("fix_file_ok", "json");
    fs::write(&path, r#"{"latitude": 45.1, "longitude": 9.2, "accuracy": 12.0}"#).unwrap();

    let got = FileProvider::new(&path)
        .current_position(Duration::from_secs(1))
        .unwrap();
    assert_eq!(got.coordinate, Coordinate::new(45.1, 9.2).unwrap());
    assert_eq!(got.accuracy_meters, Some(12.0));

    fs::remove_file(&path).ok();
}

#[test]
fn test_file_provider_failures() {
    let missing = temp_out("fix_file_missing", "json");
    assert_eq!(
        FileProvider::new(&missing).current_position(Duration::from_secs(1)),
        Err(LocationFailure::PositionUnavailable)
    );

    let garbage = temp_out("fix_file_garbage", "json");
    fs::write(&garbage, "not json").unwrap();
    assert_eq!(
        FileProvider::new(&garbage).current_position(Duration::from_secs(1)),
        Err(LocationFailure::PositionUnavailable)
    );

    let invalid = temp_out("fix_file_invalid", "json");
    fs::write(&invalid, r#"{"latitude": 95.0, "longitude": 9.2}"#).unwrap();
    assert_eq!(
        FileProvider::new(&invalid).current_position(Duration::from_secs(1)),
        Err(LocationFailure::PositionUnavailable)
    );

    fs::remove_file(&garbage).ok();
    fs::remove_file(&invalid).ok();
}
