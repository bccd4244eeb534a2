//! Restock suggestions for the shopping list.

/// Items every household is expected to keep in stock.
pub const STAPLES: &[&str] = &["Milk", "Eggs", "Bread"];

/// Suggested when every staple is already stocked.
pub const FALLBACK_SUGGESTION: &str = "Coffee";

/// Suggest staples missing from `stocked`, in [`STAPLES`] order.
///
/// Names must match exactly. When nothing is missing the fallback
/// suggestion is returned so the list is never empty.
///
/// ```
/// use freshkeep_core::rules::suggest_restock;
///
/// assert_eq!(suggest_restock(&["Milk"]), vec!["Eggs", "Bread"]);
/// assert_eq!(suggest_restock(&["Milk", "Eggs", "Bread"]), vec!["Coffee"]);
/// ```
#[must_use]
pub fn suggest_restock<S: AsRef<str>>(stocked: &[S]) -> Vec<String> {
    let missing: Vec<String> = STAPLES
        .iter()
        .filter(|staple| !stocked.iter().any(|s| s.as_ref() == **staple))
        .map(|staple| (*staple).to_owned())
        .collect();

    if missing.is_empty() {
        vec![FALLBACK_SUGGESTION.to_owned()]
    } else {
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_everything_missing() {
        let none: [&str; 0] = [];
        assert_eq!(suggest_restock(&none), vec!["Milk", "Eggs", "Bread"]);
    }

    #[test]
    fn test_keeps_staple_order() {
        assert_eq!(suggest_restock(&["Bread"]), vec!["Milk", "Eggs"]);
        assert_eq!(suggest_restock(&["Eggs", "Milk"]), vec!["Bread"]);
    }

    #[test]
    fn test_fully_stocked_falls_back() {
        let stocked = vec!["Bread".to_owned(), "Eggs".to_owned(), "Milk".to_owned()];
        assert_eq!(suggest_restock(&stocked), vec!["Coffee"]);
    }

    #[test]
    fn test_exact_match_only() {
        assert_eq!(suggest_restock(&["milk", "Eggs", "Bread"]), vec!["Milk"]);
    }
}
