use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;

/// Maximum visible width of the "operation (target)" column.
const OP_WIDTH: usize = 60;

fn strip_ansi(re: &Regex, s: &str) -> String {
    re.replace_all(s, "").into_owned()
}

/// ANSI colour for each audited operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "start" => Colour::Green,
        "stop" => Colour::Red,
        "project_add" => Colour::Cyan,
        "project_edit" => Colour::Yellow,
        "project_del" => Colour::Purple,
        "migration_applied" => Colour::Purple,
        "backup" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

struct LogRow {
    id: i64,
    date: String,
    operation: String,
    target: String,
    message: String,
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &mut DbPool) -> AppResult<()> {
        let mut stmt = pool.conn.prepare_cached(
            "SELECT id, date, operation, target, message FROM log ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let raw_date: String = row.get(1)?;
            let date = chrono::DateTime::parse_from_rfc3339(&raw_date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or(raw_date);

            Ok(LogRow {
                id: row.get(0)?,
                date,
                operation: row.get(2)?,
                target: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                message: row.get(4)?,
            })
        })?;

        let mut entries = Vec::new();
        for r in rows {
            entries.push(r?);
        }

        if entries.is_empty() {
            println!("📜 Internal log is empty.");
            return Ok(());
        }

        let ansi = Regex::new(r"\x1B\[[0-9;]*[mK]").map_err(|e| crate::errors::AppError::Other(e.to_string()))?;

        let id_w = entries.iter().map(|e| e.id.to_string().len()).max().unwrap_or(1);
        let date_w = entries.iter().map(|e| e.date.len()).max().unwrap_or(10);
        let op_w = entries
            .iter()
            .map(|e| e.operation.len() + e.target.len() + 3)
            .max()
            .unwrap_or(10)
            .min(OP_WIDTH);

        println!("📜 Internal log:\n");

        for e in entries {
            let color = color_for_operation(&e.operation);

            let visible = if e.target.is_empty() {
                e.operation.clone()
            } else {
                format!("{} ({})", e.operation, e.target)
            };

            let visible = if visible.chars().count() > OP_WIDTH {
                let mut s: String = visible.chars().take(OP_WIDTH - 3).collect();
                s.push_str("...");
                s
            } else {
                visible
            };

            // only the operation word is coloured
            let colored = match visible.split_once(' ') {
                Some((op_word, rest)) => format!("{} {}", color.paint(op_word), rest),
                None => color.paint(visible.as_str()).to_string(),
            };

            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&ansi, &colored).chars().count()));

            println!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id,
                e.date,
                colored,
                padding,
                e.message,
                id_w = id_w,
                date_w = date_w
            );
        }

        Ok(())
    }
}
