//! `PostgreSQL` inventory item repository.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use freshkeep_core::{HouseholdId, ItemId, UserId};

use super::users::{USER_COLUMNS, UserRow};
use super::{ConsumedItem, ItemRepository, RepositoryError};
use crate::models::{Item, ItemChanges, NewItem, User};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i32,
    name: String,
    quantity: i32,
    expiration_date: NaiveDate,
    predicted_expiration_date: Option<NaiveDate>,
    storage_location: Option<String>,
    household_id: i32,
    added_by_user_id: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: ItemId::new(row.id),
            name: row.name,
            quantity: row.quantity,
            expiration_date: row.expiration_date,
            predicted_expiration_date: row.predicted_expiration_date,
            storage_location: row.storage_location,
            household_id: HouseholdId::new(row.household_id),
            added_by: UserId::new(row.added_by_user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ITEM_COLUMNS: &str = "id, name, quantity, expiration_date, predicted_expiration_date, \
     storage_location, household_id, added_by_user_id, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// Item repository over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgItemRepository {
    pool: PgPool,
}

impl PgItemRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ItemRepository for PgItemRepository {
    async fn create(&self, item: &NewItem) -> Result<Item, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO items (
                name, quantity, expiration_date, predicted_expiration_date,
                storage_location, household_id, added_by_user_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {ITEM_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(&item.name)
            .bind(item.quantity)
            .bind(item.expiration_date)
            .bind(item.predicted_expiration_date)
            .bind(item.storage_location.as_deref())
            .bind(item.household_id.as_i32())
            .bind(item.added_by.as_i32())
            .fetch_one(&self.pool)
            .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = $1");

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<Item>, RepositoryError> {
        let sql = format!("SELECT {ITEM_COLUMNS} FROM items WHERE household_id = $1 ORDER BY id");

        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(household_id.as_i32())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_expiring_before(
        &self,
        household_id: HouseholdId,
        before: NaiveDate,
    ) -> Result<Vec<Item>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {ITEM_COLUMNS}
            FROM items
            WHERE household_id = $1 AND expiration_date < $2
            ORDER BY expiration_date, id
            "
        );

        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(household_id.as_i32())
            .bind(before)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, id: ItemId, changes: &ItemChanges) -> Result<Item, RepositoryError> {
        let sql = format!(
            r"
            UPDATE items
            SET name = $2,
                quantity = $3,
                expiration_date = $4,
                predicted_expiration_date = $5,
                storage_location = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id.as_i32())
            .bind(&changes.name)
            .bind(changes.quantity)
            .bind(changes.expiration_date)
            .bind(changes.predicted_expiration_date)
            .bind(changes.storage_location.as_deref())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        Ok(row.into())
    }

    async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id.as_i32())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn consume(
        &self,
        id: ItemId,
        user_id: UserId,
        co2_saved_kg: f64,
    ) -> Result<ConsumedItem, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        // Lock the user row first so concurrent consumptions serialise on the
        // running total.
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        let before: User = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_i32())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .try_into()?;

        let sql = format!("DELETE FROM items WHERE id = $1 RETURNING {ITEM_COLUMNS}");
        let item: Item = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?
            .into();

        let user = if co2_saved_kg > 0.0 {
            let sql = format!(
                r"
                UPDATE users
                SET total_co2_saved_kg = total_co2_saved_kg + $2,
                    updated_at = now()
                WHERE id = $1
                RETURNING {USER_COLUMNS}
                "
            );
            sqlx::query_as::<_, UserRow>(&sql)
                .bind(user_id.as_i32())
                .bind(co2_saved_kg)
                .fetch_one(&mut *tx)
                .await?
                .try_into()?
        } else {
            before.clone()
        };

        tx.commit().await?;

        Ok(ConsumedItem {
            item,
            user,
            previous_total_co2_saved_kg: before.total_co2_saved_kg,
        })
    }
}
