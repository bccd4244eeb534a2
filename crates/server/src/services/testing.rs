//! Shared fixtures for service tests.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;

use freshkeep_core::Email;

use super::{
    AccountService, ApplianceSyncService, Caller, Clock, FixedClock, ItemService, RewardIssuer,
    RewardReceipt, ShoppingService,
};
use crate::db::{MemoryStore, Repositories};
use crate::models::{Household, NewUser, User};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Issuer that only counts mints.
#[derive(Debug, Default)]
pub struct CountingRewardIssuer {
    minted: AtomicUsize,
}

impl CountingRewardIssuer {
    pub fn count(&self) -> usize {
        self.minted.load(Ordering::SeqCst)
    }
}

impl RewardIssuer for CountingRewardIssuer {
    fn mint_achievement(&self, _user: &User, achievement: &str) -> RewardReceipt {
        self.minted.fetch_add(1, Ordering::SeqCst);
        RewardReceipt {
            achievement: achievement.to_owned(),
            transaction_id: format!("0x{}", "0".repeat(64)),
        }
    }
}

/// In-memory repositories seeded with one household and one member.
pub struct Fixture {
    pub store: MemoryStore,
    pub repos: Repositories,
    pub clock: FixedClock,
    pub rewards: CountingRewardIssuer,
    pub household: Household,
    pub user: User,
}

impl Fixture {
    pub async fn new() -> Self {
        let store = MemoryStore::default();
        let repos = Repositories::from_store(&store);
        let household = repos.households.create("Test Home").await.unwrap();
        let user = repos
            .users
            .create(&NewUser {
                email: Email::parse("member@example.com").unwrap(),
                password_hash: "not-a-real-hash".to_owned(),
                name: "Member".to_owned(),
                household_id: Some(household.id),
            })
            .await
            .unwrap();

        Self {
            store,
            repos,
            clock: FixedClock(date(2025, 6, 15)),
            rewards: CountingRewardIssuer::default(),
            household,
            user,
        }
    }

    pub const fn caller(&self) -> Caller {
        Caller::new(self.user.id)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn items(&self) -> ItemService<'_> {
        ItemService::new(&self.repos, &self.clock, &self.rewards)
    }

    pub fn shopping(&self) -> ShoppingService<'_> {
        ShoppingService::new(&self.repos)
    }

    pub fn appliance(&self) -> ApplianceSyncService<'_> {
        ApplianceSyncService::new(&self.repos)
    }

    pub fn accounts(&self) -> AccountService<'_> {
        AccountService::new(&self.repos)
    }
}
