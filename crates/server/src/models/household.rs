//! Household domain types.

use chrono::{DateTime, Utc};

use freshkeep_core::HouseholdId;

/// A group of users sharing one inventory and one shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct Household {
    /// Unique household ID.
    pub id: HouseholdId,
    /// Display name.
    pub name: String,
    /// When the household was created.
    pub created_at: DateTime<Utc>,
    /// When the household was last updated.
    pub updated_at: DateTime<Utc>,
}
