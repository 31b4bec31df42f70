use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::log::ttlog_or_warn;
use crate::db::migrate::{pending_migrations, run_pending_migrations};
use crate::db::pool::DbPool;
use crate::db::stats;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, RED, RESET, YELLOW};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Db {
        migrate,
        check,
        vacuum,
        info,
    } = cmd
    {
        let mut pool = DbPool::new(&cfg.database)?;

        //
        // 1) MIGRATE
        //
        if *migrate {
            println!("{}▶ Running migrations…{}", CYAN, RESET);
            let applied = run_pending_migrations(&pool.conn)?;
            if applied > 0 {
                ttlog_or_warn(
                    &pool.conn,
                    "db_migrate",
                    "",
                    &format!("{} migration(s) applied", applied),
                );
            }
            println!(
                "{}✔ Migration completed ({} applied).{}\n",
                GREEN, applied, RESET
            );
        }

        //
        // 2) INFO
        //
        if *info {
            stats::print_db_info(&mut pool, &cfg.database)?;
        }

        //
        // 3) CHECK
        //
        if *check {
            println!("{}▶ Running integrity check…{}", CYAN, RESET);

            let integrity: String = pool
                .conn
                .query_row("PRAGMA integrity_check;", [], |row| row.get(0))?;

            if integrity == "ok" {
                println!("{}✔ Integrity check passed.{}", GREEN, RESET);
            } else {
                println!("{}✘ Integrity check failed:{} {}", RED, RESET, integrity);
            }

            let pending = pending_migrations(&pool.conn)?;
            if pending.is_empty() {
                println!("{}✔ Schema up to date.{}\n", GREEN, RESET);
            } else {
                println!(
                    "{}⚠ Pending migrations:{} {}\n",
                    YELLOW,
                    RESET,
                    pending.join(", ")
                );
            }
        }

        //
        // 4) VACUUM
        //
        if *vacuum {
            println!("{}▶ Running VACUUM…{}", CYAN, RESET);
            pool.conn.execute_batch("VACUUM;")?;
            println!("{}✔ Vacuum completed.{}\n", GREEN, RESET);
        }
    }

    Ok(())
}
