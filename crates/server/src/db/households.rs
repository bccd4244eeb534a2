//! `PostgreSQL` household repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use freshkeep_core::HouseholdId;

use super::{HouseholdRepository, RepositoryError};
use crate::models::Household;

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
struct HouseholdRow {
    id: i32,
    name: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<HouseholdRow> for Household {
    fn from(row: HouseholdRow) -> Self {
        Self {
            id: HouseholdId::new(row.id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Household repository over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgHouseholdRepository {
    pool: PgPool,
}

impl PgHouseholdRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HouseholdRepository for PgHouseholdRepository {
    async fn create(&self, name: &str) -> Result<Household, RepositoryError> {
        let row = sqlx::query_as::<_, HouseholdRow>(
            r"
            INSERT INTO households (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            ",
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_by_id(&self, id: HouseholdId) -> Result<Option<Household>, RepositoryError> {
        let row = sqlx::query_as::<_, HouseholdRow>(
            r"
            SELECT id, name, created_at, updated_at
            FROM households
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Household>, RepositoryError> {
        let rows = sqlx::query_as::<_, HouseholdRow>(
            r"
            SELECT id, name, created_at, updated_at
            FROM households
            ORDER BY id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
