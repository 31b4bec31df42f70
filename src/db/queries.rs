use crate::errors::{AppError, AppResult};
use crate::models::coordinate::Coordinate;
use crate::models::project::Project;
use crate::models::time_entry::TimeEntry;
use chrono::{DateTime, Local, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

const ENTRY_COLUMNS: &str = "id, user_id, project_id, start_time, end_time, lunch_minutes,
     start_lat, start_lon, end_lat, end_lon";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_timestamp(idx: usize, raw: &str) -> Result<DateTime<Local>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Local))
        .map_err(|_| conversion_error(idx, AppError::CorruptRecord(format!("bad timestamp '{}'", raw))))
}

fn date_str(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

// ---------------------------
// Projects
// ---------------------------

pub fn map_project(row: &Row) -> Result<Project> {
    Ok(Project {
        id: row.get("id")?,
        name: row.get("name")?,
        location: Coordinate {
            latitude: row.get("latitude")?,
            longitude: row.get("longitude")?,
        },
        allowed_radius_meters: row.get("radius_meters")?,
        lunch_minutes: row.get("lunch_minutes")?,
    })
}

/// Insert a project and return its new id.
pub fn insert_project(conn: &Connection, p: &Project) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO projects (name, latitude, longitude, radius_meters, lunch_minutes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            p.name,
            p.location.latitude,
            p.location.longitude,
            p.allowed_radius_meters,
            p.lunch_minutes,
            Local::now().to_rfc3339(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update all fields except id.
pub fn update_project(conn: &Connection, p: &Project) -> AppResult<()> {
    conn.execute(
        "UPDATE projects
         SET name = ?1, latitude = ?2, longitude = ?3,
             radius_meters = ?4, lunch_minutes = ?5
         WHERE id = ?6",
        params![
            p.name,
            p.location.latitude,
            p.location.longitude,
            p.allowed_radius_meters,
            p.lunch_minutes,
            p.id,
        ],
    )?;
    Ok(())
}

pub fn delete_project(conn: &Connection, id: i64) -> AppResult<()> {
    conn.execute("DELETE FROM projects WHERE id = ?1", [id])?;
    Ok(())
}

pub fn load_project(conn: &Connection, id: i64) -> AppResult<Option<Project>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM projects WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_project).optional()?)
}

pub fn load_projects(conn: &Connection) -> AppResult<Vec<Project>> {
    let mut stmt = conn.prepare("SELECT * FROM projects ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_project)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_entries_for_project(conn: &Connection, project_id: i64) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM time_entries WHERE project_id = ?1",
        [project_id],
        |row| row.get(0),
    )?)
}

// ---------------------------
// Time entries
// ---------------------------

pub fn map_entry(row: &Row) -> Result<TimeEntry> {
    let start_raw: String = row.get("start_time")?;
    let end_raw: Option<String> = row.get("end_time")?;

    let start_time = parse_timestamp(3, &start_raw)?;
    let end_time = match end_raw {
        Some(ref s) => Some(parse_timestamp(4, s)?),
        None => None,
    };

    let end_lat: Option<f64> = row.get("end_lat")?;
    let end_lon: Option<f64> = row.get("end_lon")?;
    let end_location = match (end_lat, end_lon) {
        (Some(latitude), Some(longitude)) => Some(Coordinate {
            latitude,
            longitude,
        }),
        _ => None,
    };

    Ok(TimeEntry {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        project_id: row.get("project_id")?,
        start_time,
        end_time,
        lunch_minutes: row.get("lunch_minutes")?,
        start_location: Coordinate {
            latitude: row.get("start_lat")?,
            longitude: row.get("start_lon")?,
        },
        end_location,
    })
}

fn collect_entries(conn: &Connection, sql: &str, args: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Insert a new entry and return its id.
pub fn insert_entry(conn: &Connection, e: &TimeEntry) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO time_entries
            (user_id, project_id, start_time, start_date, end_time, lunch_minutes,
             start_lat, start_lon, end_lat, end_lon)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            e.user_id,
            e.project_id,
            e.start_time.to_rfc3339(),
            date_str(&e.work_date()),
            e.end_time.map(|t| t.to_rfc3339()),
            e.lunch_minutes,
            e.start_location.latitude,
            e.start_location.longitude,
            e.end_location.map(|c| c.latitude),
            e.end_location.map(|c| c.longitude),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Update an entry (all fields except id).
pub fn update_entry(conn: &Connection, e: &TimeEntry) -> AppResult<()> {
    conn.execute(
        "UPDATE time_entries
         SET user_id = ?1, project_id = ?2, start_time = ?3, start_date = ?4,
             end_time = ?5, lunch_minutes = ?6,
             start_lat = ?7, start_lon = ?8, end_lat = ?9, end_lon = ?10
         WHERE id = ?11",
        params![
            e.user_id,
            e.project_id,
            e.start_time.to_rfc3339(),
            date_str(&e.work_date()),
            e.end_time.map(|t| t.to_rfc3339()),
            e.lunch_minutes,
            e.start_location.latitude,
            e.start_location.longitude,
            e.end_location.map(|c| c.latitude),
            e.end_location.map(|c| c.longitude),
            e.id,
        ],
    )?;
    Ok(())
}

pub fn load_entry(conn: &Connection, id: i64) -> AppResult<Option<TimeEntry>> {
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM time_entries WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;
    Ok(stmt.query_row([id], map_entry).optional()?)
}

pub fn load_open_entry(conn: &Connection, user_id: &str, project_id: i64) -> AppResult<Option<TimeEntry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM time_entries
         WHERE user_id = ?1 AND project_id = ?2 AND end_time IS NULL
         ORDER BY start_time DESC
         LIMIT 1"
    );
    let mut stmt = conn.prepare(&sql)?;
    Ok(stmt.query_row(params![user_id, project_id], map_entry).optional()?)
}

pub fn load_open_entries(conn: &Connection, user_id: &str) -> AppResult<Vec<TimeEntry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM time_entries
         WHERE user_id = ?1 AND end_time IS NULL
         ORDER BY start_time ASC"
    );
    collect_entries(conn, &sql, params![user_id])
}

/// Entries of `user_id` whose local start date lies in `[from, to)`,
/// optionally restricted to one project.
pub fn load_entries_between(
    conn: &Connection,
    user_id: &str,
    project_id: Option<i64>,
    from: NaiveDate,
    to: NaiveDate,
) -> AppResult<Vec<TimeEntry>> {
    let from_s = date_str(&from);
    let to_s = date_str(&to);

    match project_id {
        Some(pid) => {
            let sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM time_entries
                 WHERE user_id = ?1 AND start_date >= ?2 AND start_date < ?3 AND project_id = ?4
                 ORDER BY start_time ASC"
            );
            collect_entries(conn, &sql, params![user_id, from_s, to_s, pid])
        }
        None => {
            let sql = format!(
                "SELECT {ENTRY_COLUMNS} FROM time_entries
                 WHERE user_id = ?1 AND start_date >= ?2 AND start_date < ?3
                 ORDER BY start_time ASC"
            );
            collect_entries(conn, &sql, params![user_id, from_s, to_s])
        }
    }
}
