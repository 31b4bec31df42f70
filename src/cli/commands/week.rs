use crate::cli::commands::resolve_user;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::calculator::week::{aggregate_by_day, week_monday};
use crate::db::initialize::open_db;
use crate::db::store::EntryStore;
use crate::errors::{AppError, AppResult};
use crate::models::week_summary::WeekSummary;
use crate::ui::messages::header;
use crate::utils::colors::{RESET, color_for_minutes};
use crate::utils::date::{self, weekday_label};
use crate::utils::formatting::{bold, separator};
use chrono::Days;

/// Show worked time per day for the Monday-start week containing `--date`.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Week {
        date: date_arg,
        user,
        project,
        json,
    } = cmd
    {
        let user_id = resolve_user(user, cfg)?;
        let anchor = match date_arg {
            Some(s) => date::parse_date(s).ok_or_else(|| AppError::InvalidDate(s.clone()))?,
            None => date::today(),
        };
        let week_start = week_monday(anchor);
        let week_end = week_start + Days::new(7);

        let pool = open_db(&cfg.database)?;
        let entries = pool.entries_between(&user_id, *project, week_start, week_end)?;
        let summary = aggregate_by_day(&entries, week_start);

        if *json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            print_summary(&user_id, &summary, cfg);
        }
    }

    Ok(())
}

fn print_summary(user_id: &str, summary: &WeekSummary, cfg: &Config) {
    header(format!(
        "Week of {} for {}",
        summary.week_start.format("%Y-%m-%d"),
        user_id
    ));

    for day in &summary.days {
        let total = day.formatted();
        println!(
            "{} {}  {}{:>7}{}  ({} shift{})",
            weekday_label(day.date),
            day.date.format("%Y-%m-%d"),
            color_for_minutes(day.minutes),
            total,
            RESET,
            day.entries,
            if day.entries == 1 { "" } else { "s" }
        );
    }

    println!("{}", separator(&cfg.separator_char, 36));
    println!("Total          {}", bold(&summary.total_formatted()));
}
