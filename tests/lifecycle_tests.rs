use chrono::{Duration, NaiveDate};
use rshiftlog::core::clock::ManualClock;
use rshiftlog::core::location::{Locator, RetryPolicy, StaticProvider};
use rshiftlog::core::shift::ShiftLogic;
use rshiftlog::db::store::EntryStore;
use rshiftlog::errors::{AppError, InvalidState, LocationFailure, ShiftError};
use rshiftlog::models::coordinate::Coordinate;
use rshiftlog::models::location::PositionFix;

mod common;
use common::{local, memory_pool_with_project, north_of};

fn origin() -> Coordinate {
    Coordinate::new(0.0, 0.0).unwrap()
}

fn invalid_state(err: &AppError) -> Option<&InvalidState> {
    match err.as_shift() {
        Some(ShiftError::InvalidState(s)) => Some(s),
        _ => None,
    }
}

fn no_sleep(_: std::time::Duration) {}

#[test]
fn test_start_then_stop_closes_entry() {
    let (mut pool, project) = memory_pool_with_project(100.0, 60);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));

    let started = ShiftLogic::new(&mut pool, &clock)
        .start("alice", project.id, north_of(origin(), 40.0), None)
        .unwrap();
    assert!(started.entry.is_open());
    assert_eq!(started.entry.lunch_minutes, 60);
    assert!(started.range.allowed);

    clock.set(local(2025, 1, 6, 17, 30));
    let stopped = ShiftLogic::new(&mut pool, &clock)
        .stop("alice", started.entry.id, origin())
        .unwrap();
    assert!(!stopped.entry.is_open());
    assert_eq!(stopped.entry.worked_minutes(), 450);

    let stored = pool.find_entry(started.entry.id).unwrap().unwrap();
    assert_eq!(stored.end_time, Some(local(2025, 1, 6, 17, 30)));
    assert_eq!(stored.end_location, Some(origin()));
}

#[test]
fn test_second_start_is_rejected_while_open() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));
    let mut logic = ShiftLogic::new(&mut pool, &clock);

    let first = logic.start("alice", project.id, origin(), None).unwrap();
    let err = logic.start("alice", project.id, origin(), None).unwrap_err();

    assert_eq!(
        invalid_state(&err),
        Some(&InvalidState::AlreadyClockedIn {
            entry_id: first.entry.id
        })
    );

    // other users are independent
    assert!(logic.start("bob", project.id, origin(), None).is_ok());
}

#[test]
fn test_start_out_of_range_creates_nothing() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));

    let err = ShiftLogic::new(&mut pool, &clock)
        .start("alice", project.id, north_of(origin(), 150.0), None)
        .unwrap_err();

    match err.as_shift() {
        Some(ShiftError::OutOfRange {
            distance_meters,
            radius_meters,
        }) => {
            assert!((distance_meters - 150.0).abs() < 0.5);
            assert_eq!(*radius_meters, 100.0);
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }
    assert!(pool.find_open_entry("alice", project.id).unwrap().is_none());
}

#[test]
fn test_start_on_unknown_project() {
    let (mut pool, _) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));

    let err = ShiftLogic::new(&mut pool, &clock)
        .start("alice", 999, origin(), None)
        .unwrap_err();
    assert_eq!(invalid_state(&err), Some(&InvalidState::UnknownProject(999)));
}

#[test]
fn test_lunch_override_and_clamp() {
    let (mut pool, project) = memory_pool_with_project(100.0, 60);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));
    let mut logic = ShiftLogic::new(&mut pool, &clock);

    let a = logic.start("alice", project.id, origin(), Some(15)).unwrap();
    assert_eq!(a.entry.lunch_minutes, 15);

    let b = logic.start("bob", project.id, origin(), Some(-10)).unwrap();
    assert_eq!(b.entry.lunch_minutes, 0);
}

#[test]
fn test_stop_without_open_entry() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));

    let err = ShiftLogic::new(&mut pool, &clock).stop("alice", 42, origin()).unwrap_err();
    assert_eq!(
        invalid_state(&err),
        Some(&InvalidState::NoOpenEntry { entry_id: 42 })
    );

    // closing twice fails the second time
    let id = ShiftLogic::new(&mut pool, &clock)
        .start("alice", project.id, origin(), None)
        .unwrap()
        .entry
        .id;
    clock.advance(Duration::hours(1));
    ShiftLogic::new(&mut pool, &clock).stop("alice", id, origin()).unwrap();
    let err = ShiftLogic::new(&mut pool, &clock).stop("alice", id, origin()).unwrap_err();
    assert_eq!(invalid_state(&err), Some(&InvalidState::NoOpenEntry { entry_id: id }));
}

#[test]
fn test_stop_out_of_range_keeps_entry_open() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));

    let id = ShiftLogic::new(&mut pool, &clock)
        .start("alice", project.id, origin(), None)
        .unwrap()
        .entry
        .id;

    clock.advance(Duration::hours(8));
    let err = ShiftLogic::new(&mut pool, &clock)
        .stop("alice", id, north_of(origin(), 500.0))
        .unwrap_err();
    assert!(matches!(err.as_shift(), Some(ShiftError::OutOfRange { .. })));

    let entry = pool.find_entry(id).unwrap().unwrap();
    assert!(entry.is_open());
    assert!(entry.end_location.is_none());
}

#[test]
fn test_stop_by_another_user_is_rejected() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));

    let id = ShiftLogic::new(&mut pool, &clock)
        .start("alice", project.id, origin(), None)
        .unwrap()
        .entry
        .id;

    clock.advance(Duration::hours(4));
    let err = ShiftLogic::new(&mut pool, &clock)
        .stop("bob", id, origin())
        .unwrap_err();
    assert_eq!(invalid_state(&err), Some(&InvalidState::NotOwner { entry_id: id }));

    let entry = pool.find_entry(id).unwrap().unwrap();
    assert!(entry.is_open());

    // the owner can still close it
    ShiftLogic::new(&mut pool, &clock).stop("alice", id, origin()).unwrap();
}

#[test]
fn test_stop_at_start_instant_is_rejected() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));
    let mut logic = ShiftLogic::new(&mut pool, &clock);

    let id = logic.start("alice", project.id, origin(), None).unwrap().entry.id;
    let err = logic.stop("alice", id, origin()).unwrap_err();
    assert_eq!(invalid_state(&err), Some(&InvalidState::EndNotAfterStart));
}

#[test]
fn test_open_entry_id_lookup() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));
    let mut logic = ShiftLogic::new(&mut pool, &clock);

    let err = logic.open_entry_id("alice", project.id).unwrap_err();
    assert_eq!(
        invalid_state(&err),
        Some(&InvalidState::NotClockedIn {
            project_id: project.id
        })
    );

    let id = logic.start("alice", project.id, origin(), None).unwrap().entry.id;
    assert_eq!(logic.open_entry_id("alice", project.id).unwrap(), id);
}

#[test]
fn test_start_shift_without_position_fails_after_retries() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));
    let mut locator = Locator::new(StaticProvider::new(None), RetryPolicy::default()).with_sleep(no_sleep);

    let err = ShiftLogic::new(&mut pool, &clock)
        .start_shift("alice", project.id, &mut locator, None)
        .unwrap_err();

    assert!(matches!(
        err.as_shift(),
        Some(ShiftError::LocationUnavailable(LocationFailure::PositionUnavailable))
    ));
    assert!(pool.find_open_entry("alice", project.id).unwrap().is_none());
}

#[test]
fn test_start_and_stop_shift_with_locator() {
    let (mut pool, project) = memory_pool_with_project(100.0, 30);
    let clock = ManualClock::new(local(2025, 1, 6, 8, 0));
    let fix = PositionFix::new(north_of(origin(), 20.0), Some(5.0));
    let mut locator = Locator::new(StaticProvider::new(Some(fix)), RetryPolicy::default()).with_sleep(no_sleep);

    let id = ShiftLogic::new(&mut pool, &clock)
        .start_shift("alice", project.id, &mut locator, None)
        .unwrap()
        .entry
        .id;

    clock.set(local(2025, 1, 6, 16, 30));
    let out = ShiftLogic::new(&mut pool, &clock)
        .stop_shift("alice", id, &mut locator)
        .unwrap();
    assert_eq!(out.entry.worked_minutes(), 480);
}

#[test]
fn test_entries_between_filters_by_start_date() {
    let (mut pool, project) = memory_pool_with_project(100.0, 0);
    let clock = ManualClock::new(local(2025, 1, 6, 9, 0));

    for day in [5, 6, 12, 13] {
        clock.set(local(2025, 1, day, 9, 0));
        let id = ShiftLogic::new(&mut pool, &clock)
            .start("alice", project.id, origin(), None)
            .unwrap()
            .entry
            .id;
        clock.advance(Duration::hours(2));
        ShiftLogic::new(&mut pool, &clock).stop("alice", id, origin()).unwrap();
    }

    let from = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let to = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
    let entries = pool.entries_between("alice", Some(project.id), from, to).unwrap();

    let days: Vec<NaiveDate> = entries.iter().map(|e| e.work_date()).collect();
    assert_eq!(
        days,
        vec![from, NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()]
    );
    assert!(pool.entries_between("bob", None, from, to).unwrap().is_empty());
}
