//! Persistence for Freshkeep.
//!
//! # Tables
//!
//! - `households` - Groups of users sharing an inventory
//! - `users` - Household members and their CO2 savings totals
//! - `items` - Tracked groceries
//! - `shopping_lists` - One per household (`UNIQUE (household_id)`)
//! - `shopping_list_items` - Entries on a shopping list
//!
//! Each entity has a repository trait. [`Repositories::postgres`] wires the
//! `PostgreSQL` implementations; [`Repositories::in_memory`] wires a
//! [`MemoryStore`] for tests and local experiments.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p freshkeep-cli -- migrate
//! ```

pub mod households;
pub mod items;
pub mod memory;
pub mod shopping;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use freshkeep_core::{Email, HouseholdId, ItemId, ShoppingListId, ShoppingListItemId, UserId};

use crate::models::{
    Household, Item, ItemChanges, NewItem, NewUser, ShoppingList, ShoppingListItem, User,
};

pub use households::PgHouseholdRepository;
pub use items::PgItemRepository;
pub use memory::MemoryStore;
pub use shopping::{PgShoppingListItemRepository, PgShoppingListRepository};
pub use users::PgUserRepository;

/// Embedded schema migrations.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map a unique-constraint violation to [`RepositoryError::Conflict`].
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

// =============================================================================
// Repository Traits
// =============================================================================

/// Household storage.
#[async_trait]
pub trait HouseholdRepository: Send + Sync {
    /// Insert a household.
    async fn create(&self, name: &str) -> Result<Household, RepositoryError>;

    async fn get_by_id(&self, id: HouseholdId) -> Result<Option<Household>, RepositoryError>;

    /// All households, oldest first.
    async fn list_all(&self) -> Result<Vec<Household>, RepositoryError>;
}

/// User storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken.
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError>;

    /// Insert a household named `household_name` and a user belonging to it,
    /// atomically. `user.household_id` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email is already taken; no
    /// household is left behind in that case.
    async fn create_with_household(
        &self,
        household_name: &str,
        user: &NewUser,
    ) -> Result<User, RepositoryError>;

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Members of a household, oldest first.
    async fn list_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<User>, RepositoryError>;
}

/// Result of consuming an item.
#[derive(Debug, Clone)]
pub struct ConsumedItem {
    /// The deleted item as it was stored.
    pub item: Item,
    /// The consuming user after crediting.
    pub user: User,
    /// The user's total before crediting.
    pub previous_total_co2_saved_kg: f64,
}

/// Inventory item storage.
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn create(&self, item: &NewItem) -> Result<Item, RepositoryError>;

    async fn get_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError>;

    /// Items of a household in insertion order.
    async fn list_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<Item>, RepositoryError>;

    /// Items of a household expiring strictly before `before`, soonest first.
    async fn list_expiring_before(
        &self,
        household_id: HouseholdId,
        before: NaiveDate,
    ) -> Result<Vec<Item>, RepositoryError>;

    /// Overwrite an item's mutable fields and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    async fn update(&self, id: ItemId, changes: &ItemChanges) -> Result<Item, RepositoryError>;

    /// Delete an item. Returns `false` if it didn't exist.
    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError>;

    /// Atomically credit `co2_saved_kg` to `user_id` and delete the item.
    ///
    /// A non-positive credit leaves the user untouched.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item or the user doesn't
    /// exist; nothing is written in that case.
    async fn consume(
        &self,
        id: ItemId,
        user_id: UserId,
        co2_saved_kg: f64,
    ) -> Result<ConsumedItem, RepositoryError>;
}

/// Shopping list storage.
#[async_trait]
pub trait ShoppingListRepository: Send + Sync {
    /// Return the household's list, creating it with `name` if missing.
    ///
    /// Concurrent callers always observe the same list.
    async fn get_or_create(
        &self,
        household_id: HouseholdId,
        name: &str,
    ) -> Result<ShoppingList, RepositoryError>;

    async fn get_by_id(&self, id: ShoppingListId) -> Result<Option<ShoppingList>, RepositoryError>;

    async fn get_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Option<ShoppingList>, RepositoryError>;

    /// Delete a list together with its entries. Returns `false` if the list
    /// didn't exist.
    async fn delete(&self, id: ShoppingListId) -> Result<bool, RepositoryError>;
}

/// Shopping list entry storage.
#[async_trait]
pub trait ShoppingListItemRepository: Send + Sync {
    async fn create(
        &self,
        list_id: ShoppingListId,
        name: &str,
        quantity: i32,
    ) -> Result<ShoppingListItem, RepositoryError>;

    async fn get_by_id(
        &self,
        id: ShoppingListItemId,
    ) -> Result<Option<ShoppingListItem>, RepositoryError>;

    /// Entries of a list in insertion order.
    async fn list_by_list(
        &self,
        list_id: ShoppingListId,
    ) -> Result<Vec<ShoppingListItem>, RepositoryError>;

    /// Flip `is_purchased` and bump `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the entry doesn't exist.
    async fn toggle_purchased(
        &self,
        id: ShoppingListItemId,
    ) -> Result<ShoppingListItem, RepositoryError>;
}

// =============================================================================
// Repository Bundle
// =============================================================================

/// Handles to every repository, cheap to clone.
#[derive(Clone)]
pub struct Repositories {
    pub households: Arc<dyn HouseholdRepository>,
    pub users: Arc<dyn UserRepository>,
    pub items: Arc<dyn ItemRepository>,
    pub shopping_lists: Arc<dyn ShoppingListRepository>,
    pub shopping_list_items: Arc<dyn ShoppingListItemRepository>,
}

impl Repositories {
    /// Repositories backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            households: Arc::new(PgHouseholdRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            items: Arc::new(PgItemRepository::new(pool.clone())),
            shopping_lists: Arc::new(PgShoppingListRepository::new(pool.clone())),
            shopping_list_items: Arc::new(PgShoppingListItemRepository::new(pool)),
        }
    }

    /// Repositories backed by a fresh, empty [`MemoryStore`].
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_store(&MemoryStore::default())
    }

    /// Repositories sharing an existing [`MemoryStore`].
    #[must_use]
    pub fn from_store(store: &MemoryStore) -> Self {
        Self {
            households: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            items: Arc::new(store.clone()),
            shopping_lists: Arc::new(store.clone()),
            shopping_list_items: Arc::new(store.clone()),
        }
    }
}

impl std::fmt::Debug for Repositories {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repositories").finish_non_exhaustive()
    }
}
