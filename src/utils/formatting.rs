//! Formatting utilities used for CLI and export outputs.

/// One decimal, the way totals are shown everywhere.
pub fn format_number(value: f64) -> String {
    let v = if value.is_finite() { value } else { 0.0 };
    format!("{:.1}", v)
}

/// `[#####.....]` bar for a percentage already clamped to 0..=100.
pub fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(width.saturating_sub(filled))
    )
}

/// First 8 characters of an id; enough to address an entry from the CLI.
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((i, _)) => &id[..i],
        None => id,
    }
}

/// Truncate to `max` visible chars, ending with "…" when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_and_ids() {
        assert_eq!(progress_bar(50.0, 10), "[#####.....]");
        assert_eq!(progress_bar(150.0, 4), "[####]");
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(truncate("flashcards", 6), "flash…");
        assert_eq!(format_number(2.25), "2.2");
    }
}
