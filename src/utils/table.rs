//! Table rendering utilities for CLI outputs.

use regex::Regex;
use std::sync::OnceLock;

fn ansi_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\x1B\[[0-9;]*[mK]").expect("static regex"))
}

/// Visible width of a cell, ignoring ANSI escapes.
pub fn visible_width(s: &str) -> usize {
    ansi_re().replace_all(s, "").chars().count()
}

pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Compact tables skip the rule under the header.
    pub compact: bool,
}

impl Table {
    pub fn new<S: Into<String>>(headers: Vec<S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            compact: false,
        }
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, h)| {
                self.rows
                    .iter()
                    .filter_map(|r| r.get(i))
                    .map(|c| visible_width(c))
                    .chain(std::iter::once(h.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = String::new();

        // Header
        let line: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| pad(h, *w))
            .collect();
        out.push_str(line.join(" | ").trim_end());
        out.push('\n');

        if !self.compact {
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            out.push_str(&rule.join("-+-"));
            out.push('\n');
        }

        // Rows
        for row in &self.rows {
            let line: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, w)| pad(row.get(i).map(String::as_str).unwrap_or(""), *w))
                .collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
        }

        out
    }
}

fn pad(cell: &str, width: usize) -> String {
    let extra = width.saturating_sub(visible_width(cell));
    format!("{}{}", cell, " ".repeat(extra))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_align_ignoring_colors() {
        let mut t = Table::new(vec!["Food", "kcal"]);
        t.add_row(vec!["\x1b[32mApple\x1b[0m".into(), "95.0".into()]);
        t.add_row(vec!["Rice".into(), "205.0".into()]);
        let out = t.render();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Food  | kcal");
        assert_eq!(lines[1], "------+------");
        assert!(lines[3].starts_with("Rice  | 205.0"));
    }
}
