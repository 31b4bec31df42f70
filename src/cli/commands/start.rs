use crate::cli::commands::{locator, resolve_user};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::clock::SystemClock;
use crate::core::shift::ShiftLogic;
use crate::db::initialize::open_db;
use crate::db::log::ttlog_or_warn;
use crate::errors::AppResult;
use crate::ui::messages::success;
use crate::utils::colors::{RESET, color_for_range};
use crate::utils::format_distance;

/// Clock in on a project.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Start {
        project,
        user,
        lunch,
        position,
    } = cmd
    {
        let user_id = resolve_user(user, cfg)?;
        let lunch = lunch.map(|m| cfg.check_lunch(m)).transpose()?;
        let mut locator = locator(position, cfg)?;

        let mut pool = open_db(&cfg.database)?;
        let clock = SystemClock;

        let outcome = ShiftLogic::new(&mut pool, &clock).start_shift(
            &user_id,
            *project,
            &mut locator,
            lunch,
        )?;

        let entry = &outcome.entry;
        ttlog_or_warn(
            &pool.conn,
            "start",
            &format!("entry #{}", entry.id),
            &format!(
                "{} clocked in on '{}' at {} ({} from site)",
                entry.user_id,
                outcome.project.name,
                entry.start_location,
                format_distance(outcome.range.distance_meters)
            ),
        );

        success(format!(
            "Clocked in on '{}' at {} (entry #{}, {}{}{} from site, lunch {} min).",
            outcome.project.name,
            entry.start_time.format("%Y-%m-%d %H:%M"),
            entry.id,
            color_for_range(outcome.range.allowed),
            format_distance(outcome.range.distance_meters),
            RESET,
            entry.lunch_minutes
        ));
    }

    Ok(())
}
