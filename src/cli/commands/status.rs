use crate::cli::commands::resolve_user;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::duration::format_hours_minutes;
use crate::core::clock::{Clock, SystemClock};
use crate::db::initialize::open_db;
use crate::db::queries::load_project;
use crate::db::store::EntryStore;
use crate::errors::AppResult;
use crate::ui::messages::info;
use crate::utils::table::{Column, Table};

/// Show the caller's open shifts with the time elapsed so far.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Status { user } = cmd {
        let user_id = resolve_user(user, cfg)?;
        let pool = open_db(&cfg.database)?;
        let now = SystemClock.now();

        let open = pool.open_entries(&user_id)?;
        if open.is_empty() {
            info(format!("{} is not clocked in anywhere.", user_id));
            return Ok(());
        }

        let mut table = Table::new(vec![
            Column::new("ENTRY", 6),
            Column::new("PROJECT", 24),
            Column::new("STARTED", 17),
            Column::new("ELAPSED", 8),
        ]);

        for e in &open {
            let project = load_project(&pool.conn, e.project_id)?
                .map(|p| p.name)
                .unwrap_or_else(|| format!("#{}", e.project_id));

            table.add_row(vec![
                e.id.to_string(),
                project,
                e.start_time.format("%Y-%m-%d %H:%M").to_string(),
                format_hours_minutes(e.elapsed_minutes(now)),
            ]);
        }

        println!("⏱️  Open shifts for {}:\n", user_id);
        print!("{}", table.render());
    }

    Ok(())
}
