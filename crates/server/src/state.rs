//! Application state shared across handlers and resolvers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::db::Repositories;
use crate::services::{
    AccountService, ApplianceSyncService, Clock, ItemService, RewardIssuer, ShoppingService,
    SimulatedRewardIssuer, SystemClock,
};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and hands out the per-request
/// services.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    repos: Repositories,
    clock: Arc<dyn Clock>,
    rewards: Arc<dyn RewardIssuer>,
    pool: Option<PgPool>,
}

impl AppState {
    /// Create the production state over a `PostgreSQL` pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                repos: Repositories::postgres(pool.clone()),
                clock: Arc::new(SystemClock),
                rewards: Arc::new(SimulatedRewardIssuer),
                pool: Some(pool),
            }),
        }
    }

    /// Create a state from explicit parts, without a database pool.
    #[must_use]
    pub fn from_parts(
        repos: Repositories,
        clock: Arc<dyn Clock>,
        rewards: Arc<dyn RewardIssuer>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                repos,
                clock,
                rewards,
                pool: None,
            }),
        }
    }

    /// Get a reference to the repositories.
    #[must_use]
    pub fn repos(&self) -> &Repositories {
        &self.inner.repos
    }

    /// Get a reference to the clock.
    #[must_use]
    pub fn clock(&self) -> &dyn Clock {
        self.inner.clock.as_ref()
    }

    /// Get a reference to the database connection pool, if there is one.
    #[must_use]
    pub fn pool(&self) -> Option<&PgPool> {
        self.inner.pool.as_ref()
    }

    #[must_use]
    pub fn items(&self) -> ItemService<'_> {
        ItemService::new(
            &self.inner.repos,
            self.inner.clock.as_ref(),
            self.inner.rewards.as_ref(),
        )
    }

    #[must_use]
    pub fn shopping(&self) -> ShoppingService<'_> {
        ShoppingService::new(&self.inner.repos)
    }

    #[must_use]
    pub fn appliance(&self) -> ApplianceSyncService<'_> {
        ApplianceSyncService::new(&self.inner.repos)
    }

    #[must_use]
    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(&self.inner.repos)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("has_pool", &self.inner.pool.is_some())
            .finish_non_exhaustive()
    }
}
