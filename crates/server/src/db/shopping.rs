//! `PostgreSQL` shopping list repositories.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use freshkeep_core::{HouseholdId, ShoppingListId, ShoppingListItemId};

use super::{RepositoryError, ShoppingListItemRepository, ShoppingListRepository};
use crate::models::{ShoppingList, ShoppingListItem};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ShoppingListRow {
    id: i32,
    name: String,
    household_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShoppingListRow> for ShoppingList {
    fn from(row: ShoppingListRow) -> Self {
        Self {
            id: ShoppingListId::new(row.id),
            name: row.name,
            household_id: HouseholdId::new(row.household_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ShoppingListItemRow {
    id: i32,
    name: String,
    quantity: i32,
    is_purchased: bool,
    shopping_list_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ShoppingListItemRow> for ShoppingListItem {
    fn from(row: ShoppingListItemRow) -> Self {
        Self {
            id: ShoppingListItemId::new(row.id),
            name: row.name,
            quantity: row.quantity,
            is_purchased: row.is_purchased,
            shopping_list_id: ShoppingListId::new(row.shopping_list_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const LIST_COLUMNS: &str = "id, name, household_id, created_at, updated_at";
const ENTRY_COLUMNS: &str =
    "id, name, quantity, is_purchased, shopping_list_id, created_at, updated_at";

// =============================================================================
// Shopping List Repository
// =============================================================================

/// Shopping list repository over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgShoppingListRepository {
    pool: PgPool,
}

impl PgShoppingListRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShoppingListRepository for PgShoppingListRepository {
    async fn get_or_create(
        &self,
        household_id: HouseholdId,
        name: &str,
    ) -> Result<ShoppingList, RepositoryError> {
        // The no-op update makes RETURNING yield the existing row when
        // another request created the list first.
        let sql = format!(
            r"
            INSERT INTO shopping_lists (name, household_id)
            VALUES ($1, $2)
            ON CONFLICT (household_id) DO UPDATE SET name = shopping_lists.name
            RETURNING {LIST_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, ShoppingListRow>(&sql)
            .bind(name)
            .bind(household_id.as_i32())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: ShoppingListId) -> Result<Option<ShoppingList>, RepositoryError> {
        let sql = format!("SELECT {LIST_COLUMNS} FROM shopping_lists WHERE id = $1");

        let row = sqlx::query_as::<_, ShoppingListRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn get_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Option<ShoppingList>, RepositoryError> {
        let sql = format!("SELECT {LIST_COLUMNS} FROM shopping_lists WHERE household_id = $1");

        let row = sqlx::query_as::<_, ShoppingListRow>(&sql)
            .bind(household_id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, id: ShoppingListId) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM shopping_list_items WHERE shopping_list_id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM shopping_lists WHERE id = $1")
            .bind(id.as_i32())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Shopping List Item Repository
// =============================================================================

/// Shopping list entry repository over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgShoppingListItemRepository {
    pool: PgPool,
}

impl PgShoppingListItemRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShoppingListItemRepository for PgShoppingListItemRepository {
    async fn create(
        &self,
        list_id: ShoppingListId,
        name: &str,
        quantity: i32,
    ) -> Result<ShoppingListItem, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO shopping_list_items (name, quantity, shopping_list_id)
            VALUES ($1, $2, $3)
            RETURNING {ENTRY_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, ShoppingListItemRow>(&sql)
            .bind(name)
            .bind(quantity)
            .bind(list_id.as_i32())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_by_id(
        &self,
        id: ShoppingListItemId,
    ) -> Result<Option<ShoppingListItem>, RepositoryError> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM shopping_list_items WHERE id = $1");

        let row = sqlx::query_as::<_, ShoppingListItemRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_list(
        &self,
        list_id: ShoppingListId,
    ) -> Result<Vec<ShoppingListItem>, RepositoryError> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM shopping_list_items WHERE shopping_list_id = $1 ORDER BY id"
        );

        let rows = sqlx::query_as::<_, ShoppingListItemRow>(&sql)
            .bind(list_id.as_i32())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn toggle_purchased(
        &self,
        id: ShoppingListItemId,
    ) -> Result<ShoppingListItem, RepositoryError> {
        let sql = format!(
            r"
            UPDATE shopping_list_items
            SET is_purchased = NOT is_purchased,
                updated_at = now()
            WHERE id = $1
            RETURNING {ENTRY_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, ShoppingListItemRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }
}
