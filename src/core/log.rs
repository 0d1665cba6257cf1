use crate::db::log::{LogEntry, read_log};
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use ansi_term::Colour;
use regex::Regex;
use std::sync::OnceLock;

const MAX_OP_WIDTH: usize = 60;

fn strip_ansi(s: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("valid ANSI pattern"));
    re.replace_all(s, "").into_owned()
}

/// ANSI color of an audit operation.
fn color_for_operation(op: &str) -> Colour {
    match op {
        "add" | "log" | "create" => Colour::Green,
        "remove" | "delete" | "clear" => Colour::Red,
        "edit" | "rename" | "set" | "undo" => Colour::Yellow,
        "import" | "export" => Colour::Cyan,
        "migration_applied" => Colour::Purple,
        "backup" | "vacuum" => Colour::Blue,
        "init" => Colour::RGB(255, 153, 51),
        _ => Colour::White,
    }
}

fn op_target(e: &LogEntry) -> String {
    if e.target.is_empty() {
        e.operation.clone()
    } else {
        format!("{} ({})", e.operation, e.target)
    }
}

/// Cut to `MAX_OP_WIDTH` visible chars, then color the leading operation word.
fn render_op(e: &LogEntry) -> String {
    let visible = op_target(e);
    let visible = if visible.chars().count() > MAX_OP_WIDTH {
        let mut s: String = visible.chars().take(MAX_OP_WIDTH - 3).collect();
        s.push_str("...");
        s
    } else {
        visible
    };
    let color = color_for_operation(&e.operation);
    match visible.split_once(' ') {
        Some((op, rest)) => format!("{} {}", color.paint(op), rest),
        None => color.paint(visible.as_str()).to_string(),
    }
}

/// One aligned line per entry.
pub fn format_log(entries: &[LogEntry]) -> Vec<String> {
    let op_w = entries
        .iter()
        .map(|e| op_target(e).chars().count())
        .max()
        .unwrap_or(10)
        .min(MAX_OP_WIDTH);
    let id_w = entries
        .iter()
        .map(|e| e.id.to_string().len())
        .max()
        .unwrap_or(1);

    let dates: Vec<String> = entries
        .iter()
        .map(|e| {
            chrono::DateTime::parse_from_rfc3339(&e.date)
                .map(|dt| dt.format("%FT%T%:z").to_string())
                .unwrap_or_else(|_| e.date.clone())
        })
        .collect();
    let date_w = dates.iter().map(String::len).max().unwrap_or(0);

    entries
        .iter()
        .zip(dates)
        .map(|(e, date)| {
            let op = render_op(e);
            let padding = " ".repeat(op_w.saturating_sub(strip_ansi(&op).chars().count()));
            format!(
                "{:>id_w$}: {:<date_w$} | {}{} => {}",
                e.id, date, op, padding, e.message
            )
        })
        .collect()
}

pub struct LogLogic;

impl LogLogic {
    pub fn print_log(pool: &DbPool) -> AppResult<()> {
        let entries = read_log(&pool.conn)?;
        println!("📜 Internal log:\n");
        for line in format_log(&entries) {
            println!("{line}");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, op: &str, target: &str) -> LogEntry {
        LogEntry {
            id,
            date: "2026-10-18T08:00:00+02:00".into(),
            operation: op.into(),
            target: target.into(),
            message: "done".into(),
        }
    }

    #[test]
    fn lines_align_on_visible_width() {
        let lines = format_log(&[entry(1, "add", "food:Oats"), entry(12, "backup", "")]);
        let plain: Vec<String> = lines.iter().map(|l| strip_ansi(l)).collect();
        assert_eq!(plain[0], " 1: 2026-10-18T08:00:00+02:00 | add (food:Oats) => done");
        assert_eq!(plain[1], "12: 2026-10-18T08:00:00+02:00 | backup          => done");
    }

    #[test]
    fn long_targets_are_truncated() {
        let long = "x".repeat(80);
        let line = strip_ansi(&format_log(&[entry(1, "import", &long)])[0]);
        assert!(line.contains("..."));
        let op = line.split(" | ").nth(1).unwrap().split(" => ").next().unwrap();
        assert_eq!(op.chars().count(), MAX_OP_WIDTH);
    }
}
