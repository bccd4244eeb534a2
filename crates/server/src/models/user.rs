//! User domain types.
//!
//! The password hash never leaves the repository layer once stored, so it is
//! only present on [`NewUser`].

use chrono::{DateTime, Utc};

use freshkeep_core::{Email, HouseholdId, UserId};

/// A household member (domain type).
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Normalised email address, unique across users.
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Household the user belongs to, if any.
    pub household_id: Option<HouseholdId>,
    /// Running CO2 savings total in kg. Never negative.
    pub total_co2_saved_kg: f64,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to insert a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    /// Argon2 PHC string.
    pub password_hash: String,
    pub name: String,
    pub household_id: Option<HouseholdId>,
}
