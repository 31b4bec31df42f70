use rusqlite::{Connection, OptionalExtension, Result};

/// Named schema steps, applied in order and recorded in the `log` table.
const MIGRATIONS: &[(&str, &str, &str)] = &[
    (
        "20251016_0001_create_projects",
        "Created projects table",
        r#"
        CREATE TABLE IF NOT EXISTS projects (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL,
            latitude       REAL NOT NULL CHECK(latitude BETWEEN -90 AND 90),
            longitude      REAL NOT NULL CHECK(longitude BETWEEN -180 AND 180),
            radius_meters  REAL NOT NULL CHECK(radius_meters >= 0),
            lunch_minutes  INTEGER NOT NULL DEFAULT 0 CHECK(lunch_minutes >= 0),
            created_at     TEXT NOT NULL
        );
        "#,
    ),
    (
        "20251016_0002_create_time_entries",
        "Created time_entries table",
        r#"
        CREATE TABLE IF NOT EXISTS time_entries (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        TEXT NOT NULL,
            project_id     INTEGER NOT NULL REFERENCES projects(id),
            start_time     TEXT NOT NULL,
            start_date     TEXT NOT NULL,
            end_time       TEXT,
            lunch_minutes  INTEGER NOT NULL DEFAULT 0,
            start_lat      REAL NOT NULL,
            start_lon      REAL NOT NULL,
            end_lat        REAL,
            end_lon        REAL
        );
        "#,
    ),
    (
        "20251016_0003_time_entries_indexes",
        "Indexed time_entries by user/project and start date",
        r#"
        CREATE INDEX IF NOT EXISTS idx_entries_user_project ON time_entries(user_id, project_id, end_time);
        CREATE INDEX IF NOT EXISTS idx_entries_user_date ON time_entries(user_id, start_date);
        "#,
    ),
];

/// Ensure that the `log` table exists; it also tracks applied migrations.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn apply(conn: &Connection, version: &str, message: &str, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    tx.commit()
}

/// Versions not yet recorded as applied.
pub fn pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for (version, _, _) in MIGRATIONS {
        if !is_applied(conn, version)? {
            out.push(*version);
        }
    }
    Ok(out)
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db(). Returns how many steps were applied.
pub fn run_pending_migrations(conn: &Connection) -> Result<usize> {
    ensure_log_table(conn)?;

    let mut applied = 0;
    for (version, message, sql) in MIGRATIONS {
        if is_applied(conn, version)? {
            continue;
        }
        apply(conn, version, message, sql)?;
        applied += 1;
    }

    Ok(applied)
}
