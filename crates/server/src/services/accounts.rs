//! Users, households and sustainability metrics.

use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use tracing::instrument;

use freshkeep_core::{Email, HouseholdId, UserId};

use super::{Caller, ServiceError, resolve_caller};
use crate::db::{Repositories, RepositoryError};
use crate::models::{Household, NewUser, User};

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Input for [`AccountService::create_user`].
#[derive(Debug, Clone)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Creates a household for the new user when present.
    pub household_name: Option<String>,
}

/// A user's sustainability score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SustainabilityMetrics {
    pub total_co2_saved_kg: f64,
}

/// Account and household service.
pub struct AccountService<'a> {
    repos: &'a Repositories,
}

impl<'a> AccountService<'a> {
    /// Create a new account service.
    #[must_use]
    pub const fn new(repos: &'a Repositories) -> Self {
        Self { repos }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Register a user, optionally founding a new household.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidArgument` if the email is malformed or
    /// already registered, the password is too short or a name is blank.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn create_user(&self, input: SignUp) -> Result<User, ServiceError> {
        let email = Email::parse(&input.email)?;
        validate_password(&input.password)?;
        if input.name.trim().is_empty() {
            return Err(ServiceError::InvalidArgument(
                "Name must not be blank.".to_owned(),
            ));
        }
        if let Some(household_name) = &input.household_name
            && household_name.trim().is_empty()
        {
            return Err(ServiceError::InvalidArgument(
                "Household name must not be blank.".to_owned(),
            ));
        }

        if self.repos.users.get_by_email(&email).await?.is_some() {
            return Err(email_taken(&email));
        }

        let password_hash = hash_password(&input.password)?;

        let new_user = NewUser {
            email: email.clone(),
            password_hash,
            name: input.name,
            household_id: None,
        };
        let created = match &input.household_name {
            Some(household_name) => {
                self.repos
                    .users
                    .create_with_household(household_name, &new_user)
                    .await
            }
            None => self.repos.users.create(&new_user).await,
        };
        let user = created.map_err(|e| match e {
            RepositoryError::Conflict(_) => email_taken(&email),
            other => other.into(),
        })?;

        tracing::info!(user_id = %user.id, household_id = ?user.household_id, "User created");
        Ok(user)
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn get_user(&self, id: UserId) -> Result<Option<User>, ServiceError> {
        Ok(self.repos.users.get_by_id(id).await?)
    }

    /// Get a user by email, matched case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidArgument` if the email is malformed.
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        let email = Email::parse(email)?;
        Ok(self.repos.users.get_by_email(&email).await?)
    }

    /// The caller's own user record.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::IllegalState` if the caller doesn't resolve to
    /// a user.
    pub async fn me(&self, caller: Caller) -> Result<User, ServiceError> {
        resolve_caller(self.repos, caller).await
    }

    /// The caller's CO2 savings.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::IllegalState` if the caller doesn't resolve to
    /// a user.
    pub async fn sustainability_metrics(
        &self,
        caller: Caller,
    ) -> Result<SustainabilityMetrics, ServiceError> {
        let user = resolve_caller(self.repos, caller).await?;
        Ok(SustainabilityMetrics {
            total_co2_saved_kg: user.total_co2_saved_kg,
        })
    }

    // =========================================================================
    // Households
    // =========================================================================

    /// All households.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn all_households(&self) -> Result<Vec<Household>, ServiceError> {
        Ok(self.repos.households.list_all().await?)
    }

    /// Get a household by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn household(&self, id: HouseholdId) -> Result<Option<Household>, ServiceError> {
        Ok(self.repos.households.get_by_id(id).await?)
    }

    /// Members of a household.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn members(&self, household_id: HouseholdId) -> Result<Vec<User>, ServiceError> {
        Ok(self.repos.users.list_by_household(household_id).await?)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

fn email_taken(email: &Email) -> ServiceError {
    ServiceError::InvalidArgument(format!("User with email {email} already exists."))
}

/// Validate password requirements.
fn validate_password(password: &str) -> Result<(), ServiceError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ServiceError::InvalidArgument(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters."
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| ServiceError::PasswordHash)
}
