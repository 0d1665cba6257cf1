pub mod backup;
pub mod insights;
pub mod library;
pub mod log;
pub mod quiz;
pub mod study;
pub mod tdee;
pub mod totals;
pub mod tracker;
pub mod transfer;
pub mod units;

use crate::errors::{AppError, AppResult};

/// Resolve a user selector against a list: a 1-based position, or a unique
/// prefix of an item id.
pub fn select_index<T, F>(items: &[T], id_of: F, selector: &str, what: &str) -> AppResult<usize>
where
    F: Fn(&T) -> &str,
{
    let sel = selector.trim();
    if sel.is_empty() {
        return Err(AppError::invalid(format!("Missing {what} selector")));
    }
    if let Ok(n) = sel.parse::<usize>()
        && (1..=items.len()).contains(&n)
    {
        return Ok(n - 1);
    }

    let mut matches = items
        .iter()
        .enumerate()
        .filter(|(_, item)| id_of(item).starts_with(sel));
    match (matches.next(), matches.next()) {
        (Some((i, _)), None) => Ok(i),
        (Some(_), Some(_)) => Err(AppError::invalid(format!(
            "Ambiguous {what} id '{sel}', use more characters"
        ))),
        (None, _) => Err(AppError::NotFound(format!("{what} '{sel}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &String) -> &str {
        s
    }

    #[test]
    fn selectors_accept_positions_and_id_prefixes() {
        let ids = vec!["abc123".to_string(), "abd456".to_string(), "9999".to_string()];
        assert_eq!(select_index(&ids, id, "2", "item").unwrap(), 1);
        assert_eq!(select_index(&ids, id, "abd", "item").unwrap(), 1);
        assert_eq!(select_index(&ids, id, "999", "item").unwrap(), 2);
        assert!(select_index(&ids, id, "ab", "item").is_err());
        assert!(select_index(&ids, id, "zz", "item").is_err());
        assert!(select_index(&ids, id, "", "item").is_err());
    }
}
