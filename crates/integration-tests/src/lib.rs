//! Scenario-test harness for the Freshkeep GraphQL API.
//!
//! [`TestApp`] runs the real schema over in-memory repositories with a fixed
//! clock, so tests exercise resolvers, services and repositories together
//! without a database.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p freshkeep-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_graphql::{Request, Variables};
use chrono::NaiveDate;
use serde_json::{Value, json};

use freshkeep_core::UserId;
use freshkeep_server::db::Repositories;
use freshkeep_server::graphql::{FreshkeepSchema, build_schema};
use freshkeep_server::models::User;
use freshkeep_server::services::{Caller, FixedClock, RewardIssuer, RewardReceipt};
use freshkeep_server::state::AppState;

/// Date all scenarios run on unless overridden.
pub const TODAY: (i32, u32, u32) = (2025, 6, 15);

#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reward issuer that records each mint.
#[derive(Debug, Default)]
pub struct RecordingRewards {
    minted: AtomicUsize,
}

impl RecordingRewards {
    pub fn count(&self) -> usize {
        self.minted.load(Ordering::SeqCst)
    }
}

impl RewardIssuer for RecordingRewards {
    fn mint_achievement(&self, _user: &User, achievement: &str) -> RewardReceipt {
        self.minted.fetch_add(1, Ordering::SeqCst);
        RewardReceipt {
            achievement: achievement.to_owned(),
            transaction_id: format!("0x{}", "ab".repeat(32)),
        }
    }
}

/// A signed-up user and their household.
#[derive(Debug, Clone)]
pub struct Member {
    pub user_id: String,
    pub household_id: String,
}

impl Member {
    #[must_use]
    pub fn caller(&self) -> Option<&str> {
        Some(&self.user_id)
    }
}

/// The schema over fresh in-memory state.
pub struct TestApp {
    pub schema: FreshkeepSchema,
    pub rewards: Arc<RecordingRewards>,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    #[must_use]
    pub fn new() -> Self {
        let (y, m, d) = TODAY;
        Self::on(date(y, m, d))
    }

    /// An app whose clock is fixed to `today`.
    #[must_use]
    pub fn on(today: NaiveDate) -> Self {
        let rewards = Arc::new(RecordingRewards::default());
        let state = AppState::from_parts(
            Repositories::in_memory(),
            Arc::new(FixedClock(today)),
            rewards.clone(),
        );
        Self {
            schema: build_schema(state),
            rewards,
        }
    }

    /// Execute a GraphQL document and return the serialized response.
    ///
    /// `caller` is the raw `X-User-Id` value; an unparseable one is dropped
    /// the same way the HTTP handler drops it.
    pub async fn execute(&self, caller: Option<&str>, query: &str, variables: Value) -> Value {
        let mut request = Request::new(query).variables(Variables::from_json(variables));
        if let Some(user_id) = caller.and_then(|raw| raw.parse::<UserId>().ok()) {
            request = request.data(Caller::new(user_id));
        }
        let response = self.schema.execute(request).await;
        serde_json::to_value(&response).unwrap()
    }

    /// Execute and return `data`, failing the test on any error.
    pub async fn data(&self, caller: Option<&str>, query: &str, variables: Value) -> Value {
        let response = self.execute(caller, query, variables).await;
        assert!(
            response.get("errors").is_none(),
            "unexpected errors: {response}"
        );
        response["data"].clone()
    }

    /// Execute and return the first error's `(code, message)`.
    pub async fn error(&self, caller: Option<&str>, query: &str, variables: Value) -> (String, String) {
        let response = self.execute(caller, query, variables).await;
        let error = &response["errors"][0];
        assert!(!error.is_null(), "expected an error: {response}");
        (
            error["extensions"]["code"].as_str().unwrap().to_owned(),
            error["message"].as_str().unwrap().to_owned(),
        )
    }

    /// Register a user who founds a household.
    pub async fn sign_up(&self, email: &str, household: &str) -> Member {
        let data = self
            .data(
                None,
                "mutation($input: CreateUserInput!) {
                    createUser(input: $input) { id household { id } }
                }",
                json!({ "input": {
                    "email": email,
                    "password": "correct horse",
                    "name": "Tester",
                    "householdName": household,
                }}),
            )
            .await;
        Member {
            user_id: data["createUser"]["id"].as_str().unwrap().to_owned(),
            household_id: data["createUser"]["household"]["id"]
                .as_str()
                .unwrap()
                .to_owned(),
        }
    }

    /// Add an item as `member` and return its ID.
    pub async fn create_item(
        &self,
        member: &Member,
        name: &str,
        quantity: i32,
        expiration_date: &str,
        storage_location: Option<&str>,
    ) -> String {
        let data = self
            .data(
                member.caller(),
                "mutation($input: CreateItemInput!) { createItem(input: $input) { id } }",
                json!({ "input": {
                    "name": name,
                    "quantity": quantity,
                    "expirationDate": expiration_date,
                    "storageLocation": storage_location,
                    "householdId": member.household_id,
                }}),
            )
            .await;
        data["createItem"]["id"].as_str().unwrap().to_owned()
    }

    /// The member's current CO2 total.
    pub async fn co2_total(&self, member: &Member) -> f64 {
        let data = self
            .data(
                member.caller(),
                "{ sustainabilityMetrics { totalCo2SavedKg } }",
                json!({}),
            )
            .await;
        data["sustainabilityMetrics"]["totalCo2SavedKg"]
            .as_f64()
            .unwrap()
    }
}
