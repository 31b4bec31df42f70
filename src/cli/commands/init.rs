use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::init_db;
use crate::db::log::ttlog_or_warn;
use crate::errors::AppResult;
use crate::ui::messages::success;
use rusqlite::Connection;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory (if missing)
///  - the configuration file (skipped in test mode)
///  - the SQLite database
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = Config::init_all(cli.db.clone(), cli.test)?;

    println!("⚙️  Initializing rShiftlog…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &db_path);

    let conn = Connection::open(&db_path)?;
    let applied = init_db(&conn)?;

    if applied > 0 {
        success(format!("{} migration(s) applied.", applied));
    }

    ttlog_or_warn(
        &conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &db_path),
    );

    success(format!("Database initialized at {}", &db_path));
    Ok(())
}
