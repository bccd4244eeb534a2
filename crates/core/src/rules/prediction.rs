//! Expiration date prediction.
//!
//! A stand-in for a trained model: a couple of hardcoded adjustments to the
//! date printed on the packaging, keyed by item name and storage location.

use chrono::{Days, NaiveDate};

use super::same_name;

/// Predict when an item will actually go off.
///
/// Both `name` and `storage_location` are compared case-insensitively and
/// must match exactly:
///
/// - `Milk` kept in the `Fridge` lasts 3 days past the declared date
/// - `Bread` kept in the `Pantry` goes stale 2 days before it
///
/// Anything else (including a missing location) has no prediction.
///
/// ```
/// use chrono::NaiveDate;
/// use freshkeep_core::rules::predict_expiration;
///
/// let declared = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
/// assert_eq!(
///     predict_expiration("milk", Some("FRIDGE"), declared),
///     NaiveDate::from_ymd_opt(2025, 1, 4),
/// );
/// assert_eq!(predict_expiration("Milk", None, declared), None);
/// ```
#[must_use]
pub fn predict_expiration(
    name: &str,
    storage_location: Option<&str>,
    declared: NaiveDate,
) -> Option<NaiveDate> {
    let location = storage_location?;

    if same_name(name, "Milk") && same_name(location, "Fridge") {
        declared.checked_add_days(Days::new(3))
    } else if same_name(name, "Bread") && same_name(location, "Pantry") {
        declared.checked_sub_days(Days::new(2))
    } else {
        None
    }
}
