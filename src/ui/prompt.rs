//! Interactive yes/no confirmation, skipped when `--yes` is given.

use crate::ui::messages::warning;
use std::io::{self, BufRead, Write};

/// Ask a yes/no confirmation from the user on stdin.
pub fn confirm(prompt: &str, assume_yes: bool) -> bool {
    if assume_yes {
        return true;
    }
    let stdin = io::stdin();
    confirm_from(prompt, &mut stdin.lock())
}

pub fn confirm_from<R: BufRead>(prompt: &str, input: &mut R) -> bool {
    warning(prompt);
    print!("Confirm [y/N]: ");
    let _ = io::stdout().flush();

    let mut s = String::new();
    if input.read_line(&mut s).is_ok() {
        matches!(s.trim().to_lowercase().as_str(), "y" | "yes")
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_yes_answers_confirm() {
        assert!(confirm_from("Delete?", &mut "y\n".as_bytes()));
        assert!(confirm_from("Delete?", &mut "YES\n".as_bytes()));
        assert!(!confirm_from("Delete?", &mut "\n".as_bytes()));
        assert!(!confirm_from("Delete?", &mut "".as_bytes()));
    }
}
