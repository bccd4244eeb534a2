//! Inventory item domain types.

use chrono::{DateTime, NaiveDate, Utc};

use freshkeep_core::{HouseholdId, ItemId, UserId};

/// A grocery item in a household's inventory.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// Item name as entered (e.g. "Milk").
    pub name: String,
    /// Number of units. Never negative.
    pub quantity: i32,
    /// Date printed on the packaging.
    pub expiration_date: NaiveDate,
    /// Adjusted estimate from the expiration predictor, if any.
    pub predicted_expiration_date: Option<NaiveDate>,
    /// Free-form location (e.g. "Fridge", "Pantry").
    pub storage_location: Option<String>,
    /// Owning household.
    pub household_id: HouseholdId,
    /// Member who added the item.
    pub added_by: UserId,
    /// When the item was created.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert an item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub name: String,
    pub quantity: i32,
    pub expiration_date: NaiveDate,
    pub predicted_expiration_date: Option<NaiveDate>,
    pub storage_location: Option<String>,
    pub household_id: HouseholdId,
    pub added_by: UserId,
}

/// Replacement values for an item's mutable fields.
///
/// The item service merges a partial update over the stored item before
/// handing this to the repository, so every field is a final value.
#[derive(Debug, Clone)]
pub struct ItemChanges {
    pub name: String,
    pub quantity: i32,
    pub expiration_date: NaiveDate,
    pub predicted_expiration_date: Option<NaiveDate>,
    pub storage_location: Option<String>,
}

impl From<&Item> for ItemChanges {
    fn from(item: &Item) -> Self {
        Self {
            name: item.name.clone(),
            quantity: item.quantity,
            expiration_date: item.expiration_date,
            predicted_expiration_date: item.predicted_expiration_date,
            storage_location: item.storage_location.clone(),
        }
    }
}

/// One entry reported by a smart appliance during a sync.
#[derive(Debug, Clone)]
pub struct ApplianceItem {
    pub name: String,
    pub quantity: i32,
    /// Some appliances cannot read a date; such entries only update
    /// existing items.
    pub expiration_date: Option<NaiveDate>,
}
