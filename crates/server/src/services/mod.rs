//! Business logic for Freshkeep.
//!
//! # Services
//!
//! - `items` - Item lifecycle (create, update, delete, mark as used) and
//!   recipe suggestions for expiring items
//! - `shopping` - Shopping lists and restock suggestions
//! - `appliance` - Smart-appliance inventory sync
//! - `accounts` - Users, households and sustainability metrics
//! - `rewards` - Achievement minting on CO2 milestones
//! - `ocr` - Receipt/label scanning stub
//!
//! Services borrow the repositories from [`crate::state::AppState`] and are
//! built per request. Anything acting on behalf of a user takes a [`Caller`].

pub mod accounts;
pub mod appliance;
pub mod clock;
pub mod error;
pub mod items;
pub mod ocr;
pub mod rewards;
pub mod shopping;

#[cfg(test)]
pub(crate) mod testing;

pub use accounts::{AccountService, SignUp, SustainabilityMetrics};
pub use appliance::{ApplianceSyncService, SyncSummary};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::ServiceError;
pub use items::{Consumption, CreateItem, ItemService, UpdateItem};
pub use ocr::{OcrResult, process_image};
pub use rewards::{RewardIssuer, RewardReceipt, SimulatedRewardIssuer};
pub use shopping::ShoppingService;

use freshkeep_core::UserId;

use crate::db::Repositories;
use crate::models::User;

/// The user on whose behalf a request acts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: UserId,
}

impl Caller {
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }
}

/// Load the caller's user record.
///
/// An id that doesn't resolve is a broken precondition of the request, not a
/// missing resource, so it surfaces as `IllegalState`.
pub(crate) async fn resolve_caller(
    repos: &Repositories,
    caller: Caller,
) -> Result<User, ServiceError> {
    repos
        .users
        .get_by_id(caller.user_id)
        .await?
        .ok_or_else(|| {
            ServiceError::IllegalState(format!("User with ID {} not found.", caller.user_id))
        })
}
