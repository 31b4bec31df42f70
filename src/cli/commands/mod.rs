//! One handler per subcommand, plus helpers they share.

pub mod backup;
pub mod config;
pub mod db;
pub mod init;
pub mod log;
pub mod project;
pub mod start;
pub mod status;
pub mod stop;
pub mod week;

use crate::cli::parser::PositionArgs;
use crate::config::Config;
use crate::core::location::{FileProvider, LocationProvider, Locator, StaticProvider};
use crate::errors::{AppError, AppResult};
use crate::models::coordinate::Coordinate;
use crate::models::location::PositionFix;
use crate::utils::path::expand_tilde;
use std::io::{self, Write};

/// `--user` if given, otherwise the configured default user.
pub(crate) fn resolve_user(user: &Option<String>, cfg: &Config) -> AppResult<String> {
    let u = user.clone().unwrap_or_else(|| cfg.default_user.clone());
    let u = u.trim().to_string();
    if u.is_empty() {
        return Err(AppError::Config("user id must not be empty".into()));
    }
    Ok(u)
}

/// Provider for the position flags: a fix file, typed coordinates, or nothing.
pub(crate) fn position_provider(args: &PositionArgs) -> AppResult<Box<dyn LocationProvider>> {
    if let Some(file) = &args.fix_file {
        return Ok(Box::new(FileProvider::new(expand_tilde(file))));
    }

    let fix = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => {
            let coordinate = Coordinate::new(lat, lon)
                .map_err(|e| AppError::InvalidCoordinates(e.to_string()))?;
            Some(PositionFix::new(coordinate, args.accuracy))
        }
        _ => None,
    };

    Ok(Box::new(StaticProvider::new(fix)))
}

pub(crate) fn locator(args: &PositionArgs, cfg: &Config) -> AppResult<Locator<Box<dyn LocationProvider>>> {
    Ok(Locator::new(position_provider(args)?, cfg.retry_policy()))
}

/// Ask a yes/no confirmation from the user
pub(crate) fn ask_confirmation(prompt: &str) -> bool {
    crate::ui::messages::warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}
