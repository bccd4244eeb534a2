//! Pure business rules.
//!
//! These functions never touch storage or the clock. Callers pass in the
//! inputs (including "today") and persist whatever comes back.

pub mod prediction;
pub mod recipes;
pub mod suggestions;
pub mod sustainability;

pub use prediction::predict_expiration;
pub use recipes::{ExpiringIngredient, RECIPES, Recipe, RecipeSuggestion, suggest_recipes};
pub use suggestions::{STAPLES, suggest_restock};
pub use sustainability::{CO2_FACTORS, DEFAULT_CO2_FACTOR_KG, co2_factor_for, co2_saved_kg};

/// Compare two names ignoring case, including non-ASCII letters.
///
/// ```
/// use freshkeep_core::rules::same_name;
///
/// assert!(same_name("Crème Fraîche", "CRÈME FRAÎCHE"));
/// assert!(!same_name("Milk", "Oat Milk"));
/// ```
#[must_use]
pub fn same_name(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
