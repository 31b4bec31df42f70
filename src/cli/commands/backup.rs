use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::backup::BackupLogic;
use crate::db::log::ttlog_or_warn;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::ui::messages::success;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Backup {
        file,
        compress,
        force,
    } = cmd
    {
        let written = BackupLogic::backup(&cfg.database, file, *compress, *force)?;

        success(format!("Backup created: {}", written.display()));

        let pool = DbPool::new(&cfg.database)?;
        ttlog_or_warn(
            &pool.conn,
            "backup",
            &written.to_string_lossy(),
            if *compress {
                "Backup created and compressed"
            } else {
                "Backup created"
            },
        );
    }

    Ok(())
}
