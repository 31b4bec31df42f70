use crate::cli::commands::{locator, resolve_user};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::duration::format_hours_minutes;
use crate::core::clock::SystemClock;
use crate::core::shift::ShiftLogic;
use crate::db::initialize::open_db;
use crate::db::log::ttlog_or_warn;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;
use crate::utils::format_distance;

/// Clock out of an open shift, named by entry id or by project.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Stop {
        entry,
        project,
        user,
        position,
    } = cmd
    {
        let mut locator = locator(position, cfg)?;
        let mut pool = open_db(&cfg.database)?;
        let clock = SystemClock;
        let mut logic = ShiftLogic::new(&mut pool, &clock);
        let user_id = resolve_user(user, cfg)?;

        let entry_id = match (entry, project) {
            (Some(id), _) => *id,
            (None, Some(project_id)) => logic.open_entry_id(&user_id, *project_id)?,
            (None, None) => {
                return Err(AppError::Other(
                    "specify an entry id or --project".into(),
                ));
            }
        };

        let outcome = logic.stop_shift(&user_id, entry_id, &mut locator)?;
        let entry = &outcome.entry;
        let worked = format_hours_minutes(entry.worked_minutes());

        ttlog_or_warn(
            &pool.conn,
            "stop",
            &format!("entry #{}", entry.id),
            &format!(
                "{} clocked out of '{}' ({} worked, {} from site)",
                entry.user_id,
                outcome.project.name,
                worked,
                format_distance(outcome.range.distance_meters)
            ),
        );

        success(format!(
            "Clocked out of '{}' (entry #{}): worked {} after {} min lunch.",
            outcome.project.name, entry.id, worked, entry.lunch_minutes
        ));
    }

    Ok(())
}
