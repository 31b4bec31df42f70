use chrono::{Duration, NaiveDate};
use rshiftlog::core::calculator::duration::{elapsed_minutes, format_hours_minutes, worked_minutes};
use rshiftlog::core::calculator::week::{aggregate_by_day, week_days, week_monday};
use rshiftlog::models::coordinate::Coordinate;
use rshiftlog::models::time_entry::TimeEntry;

mod common;
use common::local;

fn closed(start: chrono::DateTime<chrono::Local>, end: chrono::DateTime<chrono::Local>, lunch: i64) -> TimeEntry {
    let here = Coordinate::new(0.0, 0.0).unwrap();
    let mut e = TimeEntry::open("alice", 1, start, lunch, here);
    e.end_time = Some(end);
    e.end_location = Some(here);
    e
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn test_format_hours_minutes() {
    assert_eq!(format_hours_minutes(0), "0:00");
    assert_eq!(format_hours_minutes(5), "0:05");
    assert_eq!(format_hours_minutes(60), "1:00");
    assert_eq!(format_hours_minutes(125), "2:05");
    assert_eq!(format_hours_minutes(3360), "56:00");
    assert_eq!(format_hours_minutes(-90), "-1:30");
    assert!(format_hours_minutes(i64::MIN).starts_with('-'));
}

#[test]
fn test_full_day_with_lunch() {
    let m = worked_minutes(local(2025, 1, 6, 9, 0), local(2025, 1, 6, 17, 30), 60);
    assert_eq!(m, 450);
    assert_eq!(format_hours_minutes(m), "7:30");

    let m = worked_minutes(local(2025, 1, 6, 9, 0), local(2025, 1, 6, 17, 0), 60);
    assert_eq!(format_hours_minutes(m), "7:00");
}

#[test]
fn test_worked_minutes_never_negative() {
    assert_eq!(worked_minutes(local(2025, 1, 6, 9, 0), local(2025, 1, 6, 9, 20), 30), 0);
    assert_eq!(worked_minutes(local(2025, 1, 6, 10, 0), local(2025, 1, 6, 9, 0), 0), 0);
}

#[test]
fn test_partial_minutes_are_truncated() {
    let start = local(2025, 1, 6, 9, 0);
    let end = start + Duration::seconds(59 * 60 + 59);
    assert_eq!(worked_minutes(start, end, 0), 59);
}

#[test]
fn test_elapsed_ignores_lunch_and_clamps() {
    let start = local(2025, 1, 6, 9, 0);
    assert_eq!(elapsed_minutes(start, local(2025, 1, 6, 11, 15)), 135);
    assert_eq!(elapsed_minutes(start, local(2025, 1, 6, 8, 0)), 0);
}

#[test]
fn test_week_monday() {
    // 2025-01-06 is a Monday
    assert_eq!(week_monday(date(2025, 1, 6)), date(2025, 1, 6));
    assert_eq!(week_monday(date(2025, 1, 8)), date(2025, 1, 6));
    assert_eq!(week_monday(date(2025, 1, 12)), date(2025, 1, 6));
    assert_eq!(week_monday(date(2025, 1, 1)), date(2024, 12, 30));

    let days = week_days(date(2025, 1, 6));
    assert_eq!(days.len(), 7);
    assert_eq!(days[6], date(2025, 1, 12));
}

#[test]
fn test_two_entries_same_day_are_summed() {
    let entries = vec![
        closed(local(2025, 1, 7, 8, 0), local(2025, 1, 7, 12, 0), 0),
        closed(local(2025, 1, 7, 13, 0), local(2025, 1, 7, 16, 0), 0),
    ];

    let week = aggregate_by_day(&entries, date(2025, 1, 6));
    let tuesday = week.day(date(2025, 1, 7)).unwrap();
    assert_eq!(tuesday.minutes, 420);
    assert_eq!(tuesday.entries, 2);
    assert_eq!(tuesday.formatted(), "7:00");
    assert_eq!(week.total_minutes, 420);
}

#[test]
fn test_full_week_of_eight_hour_days() {
    let entries: Vec<TimeEntry> = (6..=12)
        .map(|d| closed(local(2025, 1, d, 8, 0), local(2025, 1, d, 16, 0), 0))
        .collect();

    let week = aggregate_by_day(&entries, date(2025, 1, 6));
    assert_eq!(week.days.len(), 7);
    assert!(week.days.iter().all(|d| d.minutes == 480));
    assert_eq!(week.total_formatted(), "56:00");
}

#[test]
fn test_cross_midnight_shift_counts_on_start_day() {
    let entries = vec![closed(local(2025, 1, 8, 22, 0), local(2025, 1, 9, 6, 0), 30)];

    let week = aggregate_by_day(&entries, date(2025, 1, 6));
    assert_eq!(week.day(date(2025, 1, 8)).unwrap().minutes, 450);
    assert_eq!(week.day(date(2025, 1, 9)).unwrap().minutes, 0);
    assert_eq!(week.total_minutes, 450);
}

#[test]
fn test_open_entries_contribute_nothing() {
    let here = Coordinate::new(0.0, 0.0).unwrap();
    let entries = vec![
        closed(local(2025, 1, 10, 8, 0), local(2025, 1, 10, 10, 0), 0),
        TimeEntry::open("alice", 1, local(2025, 1, 10, 11, 0), 0, here),
    ];

    let week = aggregate_by_day(&entries, date(2025, 1, 6));
    let friday = week.day(date(2025, 1, 10)).unwrap();
    assert_eq!(friday.minutes, 120);
    assert_eq!(friday.entries, 2);
}

#[test]
fn test_entries_outside_week_are_ignored() {
    let entries = vec![
        closed(local(2025, 1, 5, 8, 0), local(2025, 1, 5, 16, 0), 0),
        closed(local(2025, 1, 13, 8, 0), local(2025, 1, 13, 16, 0), 0),
    ];

    let week = aggregate_by_day(&entries, date(2025, 1, 6));
    assert_eq!(week.total_minutes, 0);
    assert!(week.days.iter().all(|d| d.entries == 0));
}

#[test]
fn test_empty_week_serializes_with_seven_days() {
    let week = aggregate_by_day(&[], date(2025, 1, 6));
    let json = serde_json::to_value(&week).unwrap();

    assert_eq!(json["week_start"], "2025-01-06");
    assert_eq!(json["days"].as_array().unwrap().len(), 7);
    assert_eq!(json["total_minutes"], 0);
}
