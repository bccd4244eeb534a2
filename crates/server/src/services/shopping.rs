//! Shopping lists and restock suggestions.

use tracing::instrument;

use freshkeep_core::rules::suggest_restock;
use freshkeep_core::{HouseholdId, ShoppingListId, ShoppingListItemId};

use super::ServiceError;
use super::items::{household_not_found, validate_name, validate_quantity};
use crate::db::{Repositories, RepositoryError};
use crate::models::{ShoppingList, ShoppingListItem};

/// Name given to a household's list when it is first created.
pub const DEFAULT_LIST_NAME: &str = "Main Shopping List";

/// What the suggestion heuristic assumes a household has in stock.
///
/// The heuristic doesn't look at the real inventory yet, so with this list
/// every household is told to buy coffee.
// TODO: feed the household's item names into `suggest_restock` instead.
const ASSUMED_STOCK: &[&str] = &["Milk", "Eggs", "Bread"];

/// Shopping list service.
pub struct ShoppingService<'a> {
    repos: &'a Repositories,
}

impl<'a> ShoppingService<'a> {
    /// Create a new shopping service.
    #[must_use]
    pub const fn new(repos: &'a Repositories) -> Self {
        Self { repos }
    }

    /// Return the household's shopping list, creating it on first use.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the household doesn't exist.
    #[instrument(skip(self), fields(household_id = %household_id))]
    pub async fn get_or_create_list(
        &self,
        household_id: HouseholdId,
    ) -> Result<ShoppingList, ServiceError> {
        self.ensure_household(household_id).await?;
        Ok(self
            .repos
            .shopping_lists
            .get_or_create(household_id, DEFAULT_LIST_NAME)
            .await?)
    }

    /// The household's shopping list, if it has one yet.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn find_list(
        &self,
        household_id: HouseholdId,
    ) -> Result<Option<ShoppingList>, ServiceError> {
        Ok(self
            .repos
            .shopping_lists
            .get_by_household(household_id)
            .await?)
    }

    /// Append an entry to a list. Entries are never merged by name.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the list doesn't exist and
    /// `ServiceError::InvalidArgument` for a blank name or negative quantity.
    #[instrument(skip(self), fields(list_id = %list_id))]
    pub async fn add_item(
        &self,
        list_id: ShoppingListId,
        name: &str,
        quantity: i32,
    ) -> Result<ShoppingListItem, ServiceError> {
        validate_name(name)?;
        validate_quantity(quantity)?;

        self.repos
            .shopping_lists
            .get_by_id(list_id)
            .await?
            .ok_or_else(|| list_not_found(list_id))?;

        Ok(self
            .repos
            .shopping_list_items
            .create(list_id, name, quantity)
            .await?)
    }

    /// Flip an entry's purchased flag.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the entry doesn't exist.
    #[instrument(skip(self), fields(entry_id = %item_id))]
    pub async fn toggle_purchased(
        &self,
        item_id: ShoppingListItemId,
    ) -> Result<ShoppingListItem, ServiceError> {
        let entry = self
            .repos
            .shopping_list_items
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| entry_not_found(item_id))?;

        let toggled = self
            .repos
            .shopping_list_items
            .toggle_purchased(entry.id)
            .await
            .map_err(|e| match e {
                // Deleted between the lookup and the update
                RepositoryError::NotFound => entry_not_found(item_id),
                other => other.into(),
            })?;

        tracing::debug!(list_id = %toggled.shopping_list_id, is_purchased = toggled.is_purchased, "Entry toggled");
        Ok(toggled)
    }

    /// Entries of a list in the order they were added.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn list_items(
        &self,
        list_id: ShoppingListId,
    ) -> Result<Vec<ShoppingListItem>, ServiceError> {
        Ok(self.repos.shopping_list_items.list_by_list(list_id).await?)
    }

    /// Delete a list and all of its entries. Returns `false` if the list
    /// didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the delete fails.
    #[instrument(skip(self), fields(list_id = %list_id))]
    pub async fn delete_list(&self, list_id: ShoppingListId) -> Result<bool, ServiceError> {
        let deleted = self.repos.shopping_lists.delete(list_id).await?;
        if deleted {
            tracing::info!("Shopping list deleted");
        }
        Ok(deleted)
    }

    /// Suggest staples the household should restock.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the household doesn't exist.
    pub async fn smart_suggestions(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<String>, ServiceError> {
        self.ensure_household(household_id).await?;
        Ok(suggest_restock(ASSUMED_STOCK))
    }

    async fn ensure_household(&self, household_id: HouseholdId) -> Result<(), ServiceError> {
        self.repos
            .households
            .get_by_id(household_id)
            .await?
            .map(|_| ())
            .ok_or_else(|| household_not_found(household_id))
    }
}

fn list_not_found(id: ShoppingListId) -> ServiceError {
    ServiceError::NotFound(format!("Shopping list with ID {id} not found."))
}

fn entry_not_found(id: ShoppingListItemId) -> ServiceError {
    ServiceError::NotFound(format!("Shopping list item with ID {id} not found."))
}
