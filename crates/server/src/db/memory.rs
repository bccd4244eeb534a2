//! In-memory implementation of every repository trait.
//!
//! Backs the service and GraphQL tests so they run without a database. All
//! tables live behind one async mutex, which makes every operation atomic
//! the same way the `PostgreSQL` transactions are.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use freshkeep_core::{Email, HouseholdId, ItemId, ShoppingListId, ShoppingListItemId, UserId};

use super::{
    ConsumedItem, HouseholdRepository, ItemRepository, RepositoryError,
    ShoppingListItemRepository, ShoppingListRepository, UserRepository,
};
use crate::models::{
    Household, Item, ItemChanges, NewItem, NewUser, ShoppingList, ShoppingListItem, User,
};

/// Shared in-memory store. Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    sequences: Sequences,
    households: BTreeMap<HouseholdId, Household>,
    users: BTreeMap<UserId, StoredUser>,
    items: BTreeMap<ItemId, Item>,
    lists: BTreeMap<ShoppingListId, ShoppingList>,
    entries: BTreeMap<ShoppingListItemId, ShoppingListItem>,
}

/// One counter per table, mirroring `SERIAL` columns.
#[derive(Debug, Default)]
struct Sequences {
    households: i32,
    users: i32,
    items: i32,
    lists: i32,
    entries: i32,
}

#[derive(Debug)]
struct StoredUser {
    user: User,
    password_hash: String,
}

fn next(sequence: &mut i32) -> i32 {
    *sequence += 1;
    *sequence
}

impl MemoryStore {
    /// The stored password hash for a user, if the user exists.
    pub async fn password_hash(&self, user_id: UserId) -> Option<String> {
        let state = self.state.lock().await;
        state
            .users
            .get(&user_id)
            .map(|stored| stored.password_hash.clone())
    }
}

// =============================================================================
// Households
// =============================================================================

#[async_trait]
impl HouseholdRepository for MemoryStore {
    async fn create(&self, name: &str) -> Result<Household, RepositoryError> {
        Ok(self.state.lock().await.insert_household(name))
    }

    async fn get_by_id(&self, id: HouseholdId) -> Result<Option<Household>, RepositoryError> {
        Ok(self.state.lock().await.households.get(&id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Household>, RepositoryError> {
        Ok(self.state.lock().await.households.values().cloned().collect())
    }
}

// =============================================================================
// Users
// =============================================================================

impl MemoryState {
    fn email_taken(&self, email: &Email) -> bool {
        self.users.values().any(|stored| &stored.user.email == email)
    }

    fn insert_household(&mut self, name: &str) -> Household {
        let now = Utc::now();
        let household = Household {
            id: HouseholdId::new(next(&mut self.sequences.households)),
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        };
        self.households.insert(household.id, household.clone());
        household
    }

    fn insert_user(&mut self, new_user: &NewUser, household_id: Option<HouseholdId>) -> User {
        let now = Utc::now();
        let user = User {
            id: UserId::new(next(&mut self.sequences.users)),
            email: new_user.email.clone(),
            name: new_user.name.clone(),
            household_id,
            total_co2_saved_kg: 0.0,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(
            user.id,
            StoredUser {
                user: user.clone(),
                password_hash: new_user.password_hash.clone(),
            },
        );
        user
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, new_user: &NewUser) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().await;

        if state.email_taken(&new_user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        if let Some(household_id) = new_user.household_id
            && !state.households.contains_key(&household_id)
        {
            return Err(RepositoryError::Conflict(format!(
                "household {household_id} does not exist"
            )));
        }

        Ok(state.insert_user(new_user, new_user.household_id))
    }

    async fn create_with_household(
        &self,
        household_name: &str,
        new_user: &NewUser,
    ) -> Result<User, RepositoryError> {
        let mut state = self.state.lock().await;

        if state.email_taken(&new_user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }

        let household = state.insert_household(household_name);
        Ok(state.insert_user(new_user, Some(household.id)))
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state.users.get(&id).map(|stored| stored.user.clone()))
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .find(|stored| &stored.user.email == email)
            .map(|stored| stored.user.clone()))
    }

    async fn list_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<User>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .users
            .values()
            .filter(|stored| stored.user.household_id == Some(household_id))
            .map(|stored| stored.user.clone())
            .collect())
    }
}

// =============================================================================
// Items
// =============================================================================

#[async_trait]
impl ItemRepository for MemoryStore {
    async fn create(&self, new_item: &NewItem) -> Result<Item, RepositoryError> {
        let mut state = self.state.lock().await;

        if !state.households.contains_key(&new_item.household_id) {
            return Err(RepositoryError::Conflict(format!(
                "household {} does not exist",
                new_item.household_id
            )));
        }
        if !state.users.contains_key(&new_item.added_by) {
            return Err(RepositoryError::Conflict(format!(
                "user {} does not exist",
                new_item.added_by
            )));
        }

        let now = Utc::now();
        let item = Item {
            id: ItemId::new(next(&mut state.sequences.items)),
            name: new_item.name.clone(),
            quantity: new_item.quantity,
            expiration_date: new_item.expiration_date,
            predicted_expiration_date: new_item.predicted_expiration_date,
            storage_location: new_item.storage_location.clone(),
            household_id: new_item.household_id,
            added_by: new_item.added_by,
            created_at: now,
            updated_at: now,
        };
        state.items.insert(item.id, item.clone());
        Ok(item)
    }

    async fn get_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        Ok(self.state.lock().await.items.get(&id).cloned())
    }

    async fn list_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<Item>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .items
            .values()
            .filter(|item| item.household_id == household_id)
            .cloned()
            .collect())
    }

    async fn list_expiring_before(
        &self,
        household_id: HouseholdId,
        before: NaiveDate,
    ) -> Result<Vec<Item>, RepositoryError> {
        let state = self.state.lock().await;
        let mut items: Vec<Item> = state
            .items
            .values()
            .filter(|item| item.household_id == household_id && item.expiration_date < before)
            .cloned()
            .collect();
        items.sort_by_key(|item| (item.expiration_date, item.id));
        Ok(items)
    }

    async fn update(&self, id: ItemId, changes: &ItemChanges) -> Result<Item, RepositoryError> {
        let mut state = self.state.lock().await;
        let item = state.items.get_mut(&id).ok_or(RepositoryError::NotFound)?;

        item.name.clone_from(&changes.name);
        item.quantity = changes.quantity;
        item.expiration_date = changes.expiration_date;
        item.predicted_expiration_date = changes.predicted_expiration_date;
        item.storage_location.clone_from(&changes.storage_location);
        item.updated_at = Utc::now();

        Ok(item.clone())
    }

    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        Ok(self.state.lock().await.items.remove(&id).is_some())
    }

    async fn consume(
        &self,
        id: ItemId,
        user_id: UserId,
        co2_saved_kg: f64,
    ) -> Result<ConsumedItem, RepositoryError> {
        let mut state = self.state.lock().await;

        if !state.items.contains_key(&id) {
            return Err(RepositoryError::NotFound);
        }
        let stored = state
            .users
            .get_mut(&user_id)
            .ok_or(RepositoryError::NotFound)?;

        let previous_total_co2_saved_kg = stored.user.total_co2_saved_kg;
        if co2_saved_kg > 0.0 {
            stored.user.total_co2_saved_kg += co2_saved_kg;
            stored.user.updated_at = Utc::now();
        }
        let user = stored.user.clone();

        let item = state.items.remove(&id).ok_or(RepositoryError::NotFound)?;

        Ok(ConsumedItem {
            item,
            user,
            previous_total_co2_saved_kg,
        })
    }
}

// =============================================================================
// Shopping Lists
// =============================================================================

#[async_trait]
impl ShoppingListRepository for MemoryStore {
    async fn get_or_create(
        &self,
        household_id: HouseholdId,
        name: &str,
    ) -> Result<ShoppingList, RepositoryError> {
        let mut state = self.state.lock().await;

        if let Some(list) = state
            .lists
            .values()
            .find(|list| list.household_id == household_id)
        {
            return Ok(list.clone());
        }

        let now = Utc::now();
        let list = ShoppingList {
            id: ShoppingListId::new(next(&mut state.sequences.lists)),
            name: name.to_owned(),
            household_id,
            created_at: now,
            updated_at: now,
        };
        state.lists.insert(list.id, list.clone());
        Ok(list)
    }

    async fn get_by_id(&self, id: ShoppingListId) -> Result<Option<ShoppingList>, RepositoryError> {
        Ok(self.state.lock().await.lists.get(&id).cloned())
    }

    async fn get_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Option<ShoppingList>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .lists
            .values()
            .find(|list| list.household_id == household_id)
            .cloned())
    }

    async fn delete(&self, id: ShoppingListId) -> Result<bool, RepositoryError> {
        let mut state = self.state.lock().await;
        state.entries.retain(|_, entry| entry.shopping_list_id != id);
        Ok(state.lists.remove(&id).is_some())
    }
}

#[async_trait]
impl ShoppingListItemRepository for MemoryStore {
    async fn create(
        &self,
        list_id: ShoppingListId,
        name: &str,
        quantity: i32,
    ) -> Result<ShoppingListItem, RepositoryError> {
        let mut state = self.state.lock().await;

        if !state.lists.contains_key(&list_id) {
            return Err(RepositoryError::Conflict(format!(
                "shopping list {list_id} does not exist"
            )));
        }

        let now = Utc::now();
        let entry = ShoppingListItem {
            id: ShoppingListItemId::new(next(&mut state.sequences.entries)),
            name: name.to_owned(),
            quantity,
            is_purchased: false,
            shopping_list_id: list_id,
            created_at: now,
            updated_at: now,
        };
        state.entries.insert(entry.id, entry.clone());
        Ok(entry)
    }

    async fn get_by_id(
        &self,
        id: ShoppingListItemId,
    ) -> Result<Option<ShoppingListItem>, RepositoryError> {
        Ok(self.state.lock().await.entries.get(&id).cloned())
    }

    async fn list_by_list(
        &self,
        list_id: ShoppingListId,
    ) -> Result<Vec<ShoppingListItem>, RepositoryError> {
        let state = self.state.lock().await;
        Ok(state
            .entries
            .values()
            .filter(|entry| entry.shopping_list_id == list_id)
            .cloned()
            .collect())
    }

    async fn toggle_purchased(
        &self,
        id: ShoppingListItemId,
    ) -> Result<ShoppingListItem, RepositoryError> {
        let mut state = self.state.lock().await;
        let entry = state.entries.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        entry.is_purchased = !entry.is_purchased;
        entry.updated_at = Utc::now();
        Ok(entry.clone())
    }
}
