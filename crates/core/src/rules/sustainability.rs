//! CO2 savings accounting.
//!
//! Using an item before it expires is credited with the emissions that
//! throwing it away would have caused.

use chrono::NaiveDate;

/// Per-unit CO2-equivalent (kg) by item category.
///
/// Matched in declared order; the first key found anywhere in the item name
/// wins, so "Milk Bread" counts as milk.
pub const CO2_FACTORS: &[(&str, f64)] = &[
    ("Milk", 0.5),   // per litre
    ("Bread", 0.3),  // per loaf
    ("Yogurt", 0.2), // per container
    ("Eggs", 0.1),   // per egg
];

/// Factor applied when no category matches.
pub const DEFAULT_CO2_FACTOR_KG: f64 = 0.4;

/// Look up the per-unit CO2 factor for an item name.
///
/// Matching is a case-insensitive substring test against [`CO2_FACTORS`].
#[must_use]
pub fn co2_factor_for(name: &str) -> f64 {
    let lowered = name.to_lowercase();
    CO2_FACTORS
        .iter()
        .find(|(key, _)| lowered.contains(&key.to_lowercase()))
        .map_or(DEFAULT_CO2_FACTOR_KG, |&(_, factor)| factor)
}

/// CO2 saved (kg) by consuming `quantity` units of `name` on `today`.
///
/// Items past their expiration date were wasted, not saved, and score zero.
/// An item used on its expiration day still counts.
///
/// ```
/// use chrono::NaiveDate;
/// use freshkeep_core::rules::co2_saved_kg;
///
/// let today = NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
/// let tomorrow = NaiveDate::from_ymd_opt(2025, 5, 2).unwrap();
/// assert!((co2_saved_kg("Whole Milk", 2, tomorrow, today) - 1.0).abs() < 1e-9);
/// assert_eq!(co2_saved_kg("Whole Milk", 2, today.pred_opt().unwrap(), today), 0.0);
/// ```
#[must_use]
pub fn co2_saved_kg(name: &str, quantity: i32, expiration_date: NaiveDate, today: NaiveDate) -> f64 {
    let days_until_expiration = expiration_date.signed_duration_since(today).num_days();
    if days_until_expiration < 0 {
        return 0.0;
    }

    co2_factor_for(name) * f64::from(quantity)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_factor_lookup() {
        assert!(approx(co2_factor_for("Milk"), 0.5));
        assert!(approx(co2_factor_for("sourdough bread"), 0.3));
        assert!(approx(co2_factor_for("Greek YOGURT"), 0.2));
        assert!(approx(co2_factor_for("Free-range eggs"), 0.1));
        assert!(approx(co2_factor_for("Cheddar"), DEFAULT_CO2_FACTOR_KG));
    }

    #[test]
    fn test_first_declared_key_wins() {
        assert!(approx(co2_factor_for("Milk Bread"), 0.5));
        assert!(approx(co2_factor_for("Bread and Milk"), 0.5));
        assert!(approx(co2_factor_for("Eggs in Yogurt"), 0.2));
    }

    #[test]
    fn test_expired_items_score_zero() {
        let today = date(2025, 5, 10);
        assert!(approx(co2_saved_kg("Milk", 2, date(2025, 5, 9), today), 0.0));
        assert!(approx(co2_saved_kg("Cheese", 100, date(2024, 1, 1), today), 0.0));
    }

    #[test]
    fn test_same_day_counts_as_saved() {
        let today = date(2025, 5, 10);
        assert!(approx(co2_saved_kg("Bread", 1, today, today), 0.3));
    }

    #[test]
    fn test_scales_with_quantity() {
        let today = date(2025, 5, 10);
        let later = date(2025, 6, 1);
        assert!(approx(co2_saved_kg("Milk", 2, later, today), 1.0));
        assert!(approx(co2_saved_kg("Eggs", 12, later, today), 1.2));
        assert!(approx(co2_saved_kg("Apples", 3, later, today), 1.2));
        assert!(approx(co2_saved_kg("Milk", 0, later, today), 0.0));
    }
}
