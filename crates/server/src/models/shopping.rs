//! Shopping list domain types.

use chrono::{DateTime, Utc};

use freshkeep_core::{HouseholdId, ShoppingListId, ShoppingListItemId};

/// A household's shopping list. Each household has at most one.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingList {
    pub id: ShoppingListId,
    pub name: String,
    pub household_id: HouseholdId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An entry on a shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingListItem {
    pub id: ShoppingListItemId,
    pub name: String,
    pub quantity: i32,
    pub is_purchased: bool,
    pub shopping_list_id: ShoppingListId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
