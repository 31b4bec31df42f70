#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::{DateTime, Local, TimeZone};
use rshiftlog::core::project::ProjectLogic;
use rshiftlog::db::initialize::init_db;
use rshiftlog::db::pool::DbPool;
use rshiftlog::models::coordinate::Coordinate;
use rshiftlog::models::project::Project;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rsl() -> Command {
    cargo_bin_cmd!("rshiftlog")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rshiftlog.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize a DB through the CLI and register one project at (45.0, 9.0),
/// radius 100 m, lunch 60 min.
pub fn init_db_with_project(db_path: &str) {
    rsl()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rsl()
        .args([
            "--db", db_path, "project", "add", "--name", "Main site", "--lat", "45.0", "--lon",
            "9.0", "--radius", "100", "--lunch", "60",
        ])
        .assert()
        .success();
}

/// Local timestamp helper for library tests.
pub fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Local> {
    Local
        .with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .expect("unambiguous local time")
}

/// Point `meters` due north of `origin` (exact for the spherical model).
pub fn north_of(origin: Coordinate, meters: f64) -> Coordinate {
    let d_lat = (meters / rshiftlog::core::geofence::EARTH_RADIUS_METERS).to_degrees();
    Coordinate::new(origin.latitude + d_lat, origin.longitude).expect("valid coordinate")
}

/// Fresh in-memory database with the current schema.
pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}

/// In-memory database holding one project at (0, 0).
pub fn memory_pool_with_project(radius: f64, lunch: i64) -> (DbPool, Project) {
    let mut pool = memory_pool();
    let origin = Coordinate::new(0.0, 0.0).expect("origin");
    let project = ProjectLogic::add(&mut pool, "Origin site", origin, radius, lunch).expect("add project");
    (pool, project)
}
