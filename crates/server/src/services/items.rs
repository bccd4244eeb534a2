//! Item lifecycle.
//!
//! Adding an item runs the expiration predictor; using an item credits the
//! caller with the CO2 its waste would have caused and removes it from the
//! inventory.

use chrono::{NaiveDate, TimeDelta};
use tracing::instrument;

use freshkeep_core::rules::{
    ExpiringIngredient, RECIPES, RecipeSuggestion, co2_saved_kg, predict_expiration,
    suggest_recipes,
};
use freshkeep_core::{HouseholdId, ItemId};

use super::rewards::{FIRST_10KG_ACHIEVEMENT, crosses_threshold};
use super::{Caller, Clock, RewardIssuer, RewardReceipt, ServiceError, resolve_caller};
use crate::db::{Repositories, RepositoryError};
use crate::models::{Item, ItemChanges, NewItem};

/// Input for [`ItemService::create_item`].
#[derive(Debug, Clone)]
pub struct CreateItem {
    pub name: String,
    pub quantity: i32,
    pub expiration_date: NaiveDate,
    pub storage_location: Option<String>,
    pub household_id: HouseholdId,
}

/// Input for [`ItemService::update_item`]. `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub expiration_date: Option<NaiveDate>,
    pub storage_location: Option<String>,
}

/// Outcome of [`ItemService::mark_item_as_used`].
#[derive(Debug, Clone)]
pub struct Consumption {
    /// The item as it was before deletion.
    pub item: Item,
    /// CO2 credited for this item (kg).
    pub co2_saved_kg: f64,
    /// The caller's running total after crediting (kg).
    pub total_co2_saved_kg: f64,
    /// Set when this consumption crossed the achievement threshold.
    pub achievement: Option<RewardReceipt>,
}

/// Item lifecycle service.
pub struct ItemService<'a> {
    repos: &'a Repositories,
    clock: &'a dyn Clock,
    rewards: &'a dyn RewardIssuer,
}

impl<'a> ItemService<'a> {
    /// Create a new item service.
    #[must_use]
    pub const fn new(
        repos: &'a Repositories,
        clock: &'a dyn Clock,
        rewards: &'a dyn RewardIssuer,
    ) -> Self {
        Self {
            repos,
            clock,
            rewards,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Get an item by ID.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn get_item(&self, id: ItemId) -> Result<Option<Item>, ServiceError> {
        Ok(self.repos.items.get_by_id(id).await?)
    }

    /// All items of a household.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the lookup fails.
    pub async fn items_by_household(
        &self,
        household_id: HouseholdId,
    ) -> Result<Vec<Item>, ServiceError> {
        Ok(self.repos.items.list_by_household(household_id).await?)
    }

    /// Items expiring within `days_ahead` days of today, soonest first.
    ///
    /// An item expiring exactly `days_ahead` days from now is excluded.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidArgument` if the cutoff date is out of
    /// range.
    #[instrument(skip(self), fields(household_id = %household_id))]
    pub async fn expiring_items(
        &self,
        household_id: HouseholdId,
        days_ahead: i32,
    ) -> Result<Vec<Item>, ServiceError> {
        let cutoff = self
            .clock
            .today()
            .checked_add_signed(TimeDelta::days(i64::from(days_ahead)))
            .ok_or_else(|| ServiceError::InvalidArgument("daysAhead is out of range.".to_owned()))?;

        Ok(self
            .repos
            .items
            .list_expiring_before(household_id, cutoff)
            .await?)
    }

    /// Recipes that use up items expiring within `days_ahead` days, best
    /// match first.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidArgument` if the cutoff date is out of
    /// range.
    #[instrument(skip(self), fields(household_id = %household_id))]
    pub async fn recipe_suggestions(
        &self,
        household_id: HouseholdId,
        days_ahead: i32,
    ) -> Result<Vec<RecipeSuggestion<'static>>, ServiceError> {
        let items = self.expiring_items(household_id, days_ahead).await?;
        let expiring: Vec<ExpiringIngredient<'_>> = items
            .iter()
            .map(|item| ExpiringIngredient {
                name: &item.name,
                expiration_date: item.expiration_date,
            })
            .collect();

        let suggestions = suggest_recipes(RECIPES, &expiring, self.clock.today());
        tracing::debug!(expiring = expiring.len(), suggestions = suggestions.len(), "Recipes scored");
        Ok(suggestions)
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add an item to a household's inventory on behalf of the caller.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidArgument` for a blank name or negative
    /// quantity, `ServiceError::NotFound` if the household doesn't exist and
    /// `ServiceError::IllegalState` if the caller doesn't resolve to a user.
    #[instrument(skip(self, input), fields(household_id = %input.household_id, user_id = %caller.user_id))]
    pub async fn create_item(&self, caller: Caller, input: CreateItem) -> Result<Item, ServiceError> {
        validate_name(&input.name)?;
        validate_quantity(input.quantity)?;

        self.repos
            .households
            .get_by_id(input.household_id)
            .await?
            .ok_or_else(|| household_not_found(input.household_id))?;
        let user = resolve_caller(self.repos, caller).await?;

        let predicted_expiration_date = predict_expiration(
            &input.name,
            input.storage_location.as_deref(),
            input.expiration_date,
        );

        let item = self
            .repos
            .items
            .create(&NewItem {
                name: input.name,
                quantity: input.quantity,
                expiration_date: input.expiration_date,
                predicted_expiration_date,
                storage_location: input.storage_location,
                household_id: input.household_id,
                added_by: user.id,
            })
            .await?;

        tracing::info!(item_id = %item.id, "Item created");
        Ok(item)
    }

    /// Apply a partial update to an item and re-run the predictor.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the item doesn't exist and
    /// `ServiceError::InvalidArgument` if the merged values are invalid.
    #[instrument(skip(self, input), fields(item_id = %item_id))]
    pub async fn update_item(&self, item_id: ItemId, input: UpdateItem) -> Result<Item, ServiceError> {
        let existing = self
            .repos
            .items
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| item_not_found(item_id))?;

        let mut changes = ItemChanges::from(&existing);
        if let Some(name) = input.name {
            changes.name = name;
        }
        if let Some(quantity) = input.quantity {
            changes.quantity = quantity;
        }
        if let Some(expiration_date) = input.expiration_date {
            changes.expiration_date = expiration_date;
        }
        if let Some(storage_location) = input.storage_location {
            changes.storage_location = Some(storage_location);
        }

        validate_name(&changes.name)?;
        validate_quantity(changes.quantity)?;

        changes.predicted_expiration_date = predict_expiration(
            &changes.name,
            changes.storage_location.as_deref(),
            changes.expiration_date,
        );

        self.repos
            .items
            .update(item_id, &changes)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => item_not_found(item_id),
                other => other.into(),
            })
    }

    /// Delete an item. Returns `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the delete fails.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_item(&self, item_id: ItemId) -> Result<bool, ServiceError> {
        let deleted = self.repos.items.delete(item_id).await?;
        if deleted {
            tracing::info!("Item deleted");
        }
        Ok(deleted)
    }

    /// Consume an item: credit the caller with the CO2 saved and delete it.
    ///
    /// Crossing the achievement threshold mints the achievement exactly once.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the item doesn't exist and
    /// `ServiceError::IllegalState` if the caller doesn't resolve to a user.
    #[instrument(skip(self), fields(item_id = %item_id, user_id = %caller.user_id))]
    pub async fn mark_item_as_used(
        &self,
        item_id: ItemId,
        caller: Caller,
    ) -> Result<Consumption, ServiceError> {
        let item = self
            .repos
            .items
            .get_by_id(item_id)
            .await?
            .ok_or_else(|| item_not_found(item_id))?;
        let user = resolve_caller(self.repos, caller).await?;

        let co2 = co2_saved_kg(
            &item.name,
            item.quantity,
            item.expiration_date,
            self.clock.today(),
        );

        let consumed = self
            .repos
            .items
            .consume(item.id, user.id, co2)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => item_not_found(item_id),
                other => other.into(),
            })?;

        let achievement = (co2 > 0.0 && crosses_threshold(consumed.previous_total_co2_saved_kg, co2))
            .then(|| {
                self.rewards
                    .mint_achievement(&consumed.user, FIRST_10KG_ACHIEVEMENT)
            });

        tracing::info!(
            co2_saved_kg = co2,
            total_co2_saved_kg = consumed.user.total_co2_saved_kg,
            achievement = achievement.is_some(),
            "Item marked as used"
        );

        Ok(Consumption {
            item: consumed.item,
            co2_saved_kg: co2,
            total_co2_saved_kg: consumed.user.total_co2_saved_kg,
            achievement,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

pub(super) fn validate_name(name: &str) -> Result<(), ServiceError> {
    if name.trim().is_empty() {
        return Err(ServiceError::InvalidArgument(
            "Item name must not be blank.".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn validate_quantity(quantity: i32) -> Result<(), ServiceError> {
    if quantity < 0 {
        return Err(ServiceError::InvalidArgument(
            "Quantity must not be negative.".to_owned(),
        ));
    }
    Ok(())
}

pub(super) fn household_not_found(id: HouseholdId) -> ServiceError {
    ServiceError::NotFound(format!("Household with ID {id} not found."))
}

fn item_not_found(id: ItemId) -> ServiceError {
    ServiceError::NotFound(format!("Item with ID {id} not found."))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::testing::{Fixture, date};

    fn milk(fixture: &Fixture, expiration_date: NaiveDate) -> CreateItem {
        CreateItem {
            name: "Milk".to_owned(),
            quantity: 2,
            expiration_date,
            storage_location: Some("Fridge".to_owned()),
            household_id: fixture.household.id,
        }
    }

    #[tokio::test]
    async fn test_create_item_predicts_expiration() {
        let fixture = Fixture::new().await;
        let item = fixture
            .items()
            .create_item(fixture.caller(), milk(&fixture, date(2025, 1, 1)))
            .await
            .unwrap();

        assert_eq!(item.expiration_date, date(2025, 1, 1));
        assert_eq!(item.predicted_expiration_date, Some(date(2025, 1, 4)));
        assert_eq!(item.added_by, fixture.user.id);
    }

    #[tokio::test]
    async fn test_create_item_validation() {
        let fixture = Fixture::new().await;
        let service = fixture.items();

        let mut input = milk(&fixture, date(2025, 1, 1));
        input.quantity = -1;
        let err = service.create_item(fixture.caller(), input).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let mut input = milk(&fixture, date(2025, 1, 1));
        input.name = "   ".to_owned();
        let err = service.create_item(fixture.caller(), input).await.unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let mut input = milk(&fixture, date(2025, 1, 1));
        input.household_id = HouseholdId::new(404);
        let err = service.create_item(fixture.caller(), input).await.unwrap_err();
        assert_eq!(err.to_string(), "Household with ID 404 not found.");

        let stranger = Caller::new(freshkeep_core::UserId::new(404));
        let err = service
            .create_item(stranger, milk(&fixture, date(2025, 1, 1)))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::IllegalState(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_absent_fields() {
        let fixture = Fixture::new().await;
        let service = fixture.items();
        let created = service
            .create_item(fixture.caller(), milk(&fixture, date(2025, 1, 1)))
            .await
            .unwrap();

        let updated = service
            .update_item(
                created.id,
                UpdateItem {
                    quantity: Some(5),
                    ..UpdateItem::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.quantity, 5);
        assert_eq!(updated.name, "Milk");
        assert_eq!(updated.storage_location.as_deref(), Some("Fridge"));
        assert_eq!(updated.expiration_date, created.expiration_date);
        assert_eq!(
            updated.predicted_expiration_date,
            created.predicted_expiration_date
        );
    }

    #[tokio::test]
    async fn test_update_reruns_prediction() {
        let fixture = Fixture::new().await;
        let service = fixture.items();
        let created = service
            .create_item(fixture.caller(), milk(&fixture, date(2025, 1, 1)))
            .await
            .unwrap();

        let moved = service
            .update_item(
                created.id,
                UpdateItem {
                    storage_location: Some("Pantry".to_owned()),
                    ..UpdateItem::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(moved.predicted_expiration_date, None);

        let err = service
            .update_item(ItemId::new(999), UpdateItem::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Item with ID 999 not found.");
    }

    #[tokio::test]
    async fn test_delete_item_reports_whether_removed() {
        let fixture = Fixture::new().await;
        let service = fixture.items();
        let created = service
            .create_item(fixture.caller(), milk(&fixture, date(2025, 1, 1)))
            .await
            .unwrap();

        assert!(service.delete_item(created.id).await.unwrap());
        assert!(!service.delete_item(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_expiring_items_window() {
        let fixture = Fixture::new().await;
        let service = fixture.items();
        let today = fixture.today();

        for (name, offset) in [("Later", 5), ("Soon", 1), ("Edge", 3), ("Gone", -2)] {
            service
                .create_item(
                    fixture.caller(),
                    CreateItem {
                        name: name.to_owned(),
                        quantity: 1,
                        expiration_date: today + TimeDelta::days(offset),
                        storage_location: None,
                        household_id: fixture.household.id,
                    },
                )
                .await
                .unwrap();
        }

        let names: Vec<String> = service
            .expiring_items(fixture.household.id, 3)
            .await
            .unwrap()
            .into_iter()
            .map(|item| item.name)
            .collect();
        assert_eq!(names, vec!["Gone", "Soon"]);
    }

    #[tokio::test]
    async fn test_recipe_suggestions_use_expiring_items() {
        let fixture = Fixture::new().await;
        let service = fixture.items();
        let today = fixture.today();

        for (name, offset) in [("Spinach", 1), ("Eggs", 10)] {
            service
                .create_item(
                    fixture.caller(),
                    CreateItem {
                        name: name.to_owned(),
                        quantity: 1,
                        expiration_date: today + TimeDelta::days(offset),
                        storage_location: None,
                        household_id: fixture.household.id,
                    },
                )
                .await
                .unwrap();
        }

        let suggestions = service
            .recipe_suggestions(fixture.household.id, 7)
            .await
            .unwrap();
        assert_eq!(suggestions.len(), 1);
        assert_eq!(suggestions[0].recipe.name, "Spinach Omelette");
        assert_eq!(suggestions[0].matched_ingredients, vec!["Spinach"]);
        assert_eq!(suggestions[0].urgent_items_used, 1);

        assert!(
            service
                .recipe_suggestions(fixture.household.id, 1)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_mark_as_used_credits_and_deletes() {
        let fixture = Fixture::new().await;
        let service = fixture.items();
        let tomorrow = fixture.today() + TimeDelta::days(1);
        let item = service
            .create_item(fixture.caller(), milk(&fixture, tomorrow))
            .await
            .unwrap();

        let consumption = service
            .mark_item_as_used(item.id, fixture.caller())
            .await
            .unwrap();

        assert!((consumption.co2_saved_kg - 1.0).abs() < 1e-9);
        assert!((consumption.total_co2_saved_kg - 1.0).abs() < 1e-9);
        assert!(consumption.achievement.is_none());
        assert_eq!(consumption.item.id, item.id);
        assert!(service.get_item(item.id).await.unwrap().is_none());
        assert_eq!(fixture.rewards.count(), 0);
    }

    #[tokio::test]
    async fn test_mark_expired_item_credits_nothing() {
        let fixture = Fixture::new().await;
        let service = fixture.items();
        let yesterday = fixture.today() - TimeDelta::days(1);
        let item = service
            .create_item(fixture.caller(), milk(&fixture, yesterday))
            .await
            .unwrap();

        let consumption = service
            .mark_item_as_used(item.id, fixture.caller())
            .await
            .unwrap();

        assert!(consumption.co2_saved_kg.abs() < f64::EPSILON);
        assert!(consumption.total_co2_saved_kg.abs() < f64::EPSILON);
        assert!(service.get_item(item.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_achievement_fires_once_on_crossing() {
        let fixture = Fixture::new().await;
        let service = fixture.items();
        let later = fixture.today() + TimeDelta::days(7);

        // 19 litres of milk: 9.5 kg
        let bulk = CreateItem {
            quantity: 19,
            ..milk(&fixture, later)
        };
        let first = service.create_item(fixture.caller(), bulk).await.unwrap();
        let consumption = service
            .mark_item_as_used(first.id, fixture.caller())
            .await
            .unwrap();
        assert!(consumption.achievement.is_none());

        // One more litre: 10.0 kg, crossing
        let one = CreateItem {
            quantity: 1,
            ..milk(&fixture, later)
        };
        let second = service.create_item(fixture.caller(), one.clone()).await.unwrap();
        let consumption = service
            .mark_item_as_used(second.id, fixture.caller())
            .await
            .unwrap();
        let receipt = consumption.achievement.unwrap();
        assert_eq!(receipt.achievement, "First 10kg Saved");
        assert_eq!(fixture.rewards.count(), 1);

        // Already past the threshold
        let third = service.create_item(fixture.caller(), one).await.unwrap();
        let consumption = service
            .mark_item_as_used(third.id, fixture.caller())
            .await
            .unwrap();
        assert!(consumption.achievement.is_none());
        assert!((consumption.total_co2_saved_kg - 10.5).abs() < 1e-9);
        assert_eq!(fixture.rewards.count(), 1);
    }

    #[tokio::test]
    async fn test_mark_missing_item_is_not_found() {
        let fixture = Fixture::new().await;
        let err = fixture
            .items()
            .mark_item_as_used(ItemId::new(42), fixture.caller())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
