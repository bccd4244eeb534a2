//! `PostgreSQL` user repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use freshkeep_core::{Email, HouseholdId, UserId};

use super::{RepositoryError, UserRepository, map_unique_violation};
use crate::models::{NewUser, User};

// =============================================================================
// Internal Row Types
// =============================================================================

#[derive(Debug, sqlx::FromRow)]
pub(super) struct UserRow {
    id: i32,
    email: String,
    name: String,
    household_id: Option<i32>,
    total_co2_saved_kg: f64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            household_id: row.household_id.map(HouseholdId::new),
            total_co2_saved_kg: row.total_co2_saved_kg,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub(super) const USER_COLUMNS: &str =
    "id, email, name, household_id, total_co2_saved_kg, created_at, updated_at";

// =============================================================================
// Repository
// =============================================================================

/// User repository over a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO users (email, password_hash, name, household_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.email.as_str())
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(user.household_id.map(|id| id.as_i32()))
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_unique_violation(e, "email"))?;

        row.try_into()
    }

    async fn create_with_household(
        &self,
        household_name: &str,
        user: &NewUser,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let household_id: i32 =
            sqlx::query_scalar("INSERT INTO households (name) VALUES ($1) RETURNING id")
                .bind(household_name)
                .fetch_one(&mut *tx)
                .await?;

        let sql = format!(
            r"
            INSERT INTO users (email, password_hash, name, household_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.email.as_str())
            .bind(&user.password_hash)
            .bind(&user.name)
            .bind(household_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_unique_violation(e, "email"))?;

        tx.commit().await?;

        row.try_into()
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(&self.pool)
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?
            .map(TryInto::try_into)
            .transpose()
    }

    async fn list_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE household_id = $1 ORDER BY id");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(household_id.as_i32())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(TryInto::try_into)
            .collect()
    }
}
