use crate::cli::commands::ask_confirmation;
use crate::cli::parser::{Commands, ProjectAction};
use crate::config::Config;
use crate::core::project::{ProjectChanges, ProjectLogic};
use crate::db::initialize::open_db;
use crate::db::log::ttlog_or_warn;
use crate::errors::AppResult;
use crate::models::coordinate::Coordinate;
use crate::models::project::Project;
use crate::ui::messages::{info, success};
use crate::utils::format_distance;
use crate::utils::table::{Column, Table};

fn describe(p: &Project) -> String {
    format!(
        "#{} '{}' at {} (radius {}, lunch {} min)",
        p.id,
        p.name,
        p.location,
        format_distance(p.allowed_radius_meters),
        p.lunch_minutes
    )
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    let Commands::Project { action } = cmd else {
        return Ok(());
    };

    let mut pool = open_db(&cfg.database)?;

    match action {
        ProjectAction::Add {
            name,
            lat,
            lon,
            radius,
            lunch,
        } => {
            let location = Coordinate::new(*lat, *lon)?;
            let project = ProjectLogic::add(&mut pool, name, location, *radius, *lunch)?;

            ttlog_or_warn(
                &pool.conn,
                "project_add",
                &format!("project #{}", project.id),
                &describe(&project),
            );
            success(format!("Added project {}.", describe(&project)));
        }

        ProjectAction::List => {
            let projects = ProjectLogic::list(&mut pool)?;
            if projects.is_empty() {
                info("No projects yet. Add one with `project add`.");
                return Ok(());
            }

            let mut table = Table::new(vec![
                Column::new("ID", 4),
                Column::new("NAME", 24),
                Column::new("LOCATION", 24),
                Column::new("RADIUS", 10),
                Column::new("LUNCH", 6),
            ]);
            for p in &projects {
                table.add_row(vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.location.to_string(),
                    format_distance(p.allowed_radius_meters),
                    format!("{}m", p.lunch_minutes),
                ]);
            }
            print!("{}", table.render());
        }

        ProjectAction::Edit {
            id,
            name,
            lat,
            lon,
            radius,
            lunch,
        } => {
            let changes = ProjectChanges {
                name: name.clone(),
                latitude: *lat,
                longitude: *lon,
                radius_meters: *radius,
                lunch_minutes: *lunch,
            };
            let project = ProjectLogic::edit(&mut pool, *id, &changes)?;

            ttlog_or_warn(
                &pool.conn,
                "project_edit",
                &format!("project #{}", project.id),
                &describe(&project),
            );
            success(format!("Updated project {}.", describe(&project)));
        }

        ProjectAction::Del { id, yes } => {
            let project = ProjectLogic::get(&mut pool, *id)?;

            if !*yes
                && !ask_confirmation(&format!(
                    "Delete project #{} '{}'? This action is irreversible.",
                    project.id, project.name
                ))
            {
                info("Operation cancelled.");
                return Ok(());
            }

            let p = ProjectLogic::delete(&mut pool, *id)?;
            ttlog_or_warn(
                &pool.conn,
                "project_del",
                &format!("project #{}", p.id),
                &describe(&p),
            );
            success(format!("Project #{} '{}' has been deleted.", p.id, p.name));
        }
    }

    Ok(())
}
