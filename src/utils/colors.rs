/// ANSI color helper utilities for terminal output.
use crate::models::prefs::Theme;

pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";
pub const WHITE: &str = "\x1b[37m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";

/// Accent color for section headers, one per theme preset.
pub fn accent(theme: Theme) -> &'static str {
    match theme {
        Theme::Aurora => CYAN,
        Theme::Sunset => "\x1b[38;5;208m",
        Theme::Tide => BLUE,
        Theme::Mono => WHITE,
    }
}

/// Progress color:
/// under 90% → reset, 90..=100 → green, over goal → red
pub fn color_for_progress(value: f64, goal: f64) -> &'static str {
    if goal <= 0.0 {
        return RESET;
    }
    let ratio = value / goal;
    if ratio > 1.0 {
        RED
    } else if ratio >= 0.9 {
        GREEN
    } else {
        RESET
    }
}

/// Delta color for body measurements: losses green, gains yellow.
pub fn color_for_delta(value: f64) -> &'static str {
    if value < 0.0 {
        GREEN
    } else if value > 0.0 {
        YELLOW
    } else {
        RESET
    }
}

/// Grey `--` for empty cells.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}--{RESET}")
    } else {
        value.to_string()
    }
}
