//! Smart-appliance inventory sync.
//!
//! A connected fridge reports what it sees; each reported entry either
//! refreshes the household's item of the same name or, when it carries an
//! expiration date, becomes a new item.

use std::fmt;

use tracing::instrument;

use freshkeep_core::HouseholdId;
use freshkeep_core::rules::{predict_expiration, same_name};

use super::items::{household_not_found, validate_name, validate_quantity};
use super::{Caller, ServiceError, resolve_caller};
use crate::db::Repositories;
use crate::models::{ApplianceItem, ItemChanges, NewItem};

/// Counts from one sync run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub appliance_id: String,
    pub added: usize,
    pub updated: usize,
    /// New entries dropped for lack of an expiration date.
    pub skipped: usize,
}

impl fmt::Display for SyncSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sync complete for appliance {}. Added {} items, updated {} items.",
            self.appliance_id, self.added, self.updated
        )
    }
}

/// Storage location recorded on items touched by an appliance.
#[must_use]
pub fn appliance_location(appliance_id: &str) -> String {
    format!("Smart Fridge - {appliance_id}")
}

/// Smart-appliance sync service.
pub struct ApplianceSyncService<'a> {
    repos: &'a Repositories,
}

impl<'a> ApplianceSyncService<'a> {
    /// Create a new sync service.
    #[must_use]
    pub const fn new(repos: &'a Repositories) -> Self {
        Self { repos }
    }

    /// Reconcile a household's inventory against an appliance's report.
    ///
    /// Entries are applied in order and each one sees the effects of the
    /// entries before it, so a name reported twice creates at most one item.
    /// Names match case-insensitively (Unicode-aware); the first matching
    /// item wins.
    ///
    /// Every entry is validated before anything is written, so a rejected
    /// report leaves the inventory untouched.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the household doesn't exist,
    /// `ServiceError::IllegalState` if the caller doesn't resolve to a user
    /// and `ServiceError::InvalidArgument` if any entry has a blank name or
    /// negative quantity.
    #[instrument(
        skip(self, entries),
        fields(household_id = %household_id, user_id = %caller.user_id, entries = entries.len())
    )]
    pub async fn sync(
        &self,
        caller: Caller,
        household_id: HouseholdId,
        appliance_id: &str,
        entries: &[ApplianceItem],
    ) -> Result<SyncSummary, ServiceError> {
        self.repos
            .households
            .get_by_id(household_id)
            .await?
            .ok_or_else(|| household_not_found(household_id))?;
        let user = resolve_caller(self.repos, caller).await?;

        for entry in entries {
            validate_name(&entry.name)?;
            validate_quantity(entry.quantity)?;
        }

        let location = appliance_location(appliance_id);
        let mut summary = SyncSummary {
            appliance_id: appliance_id.to_owned(),
            added: 0,
            updated: 0,
            skipped: 0,
        };

        for entry in entries {
            let inventory = self.repos.items.list_by_household(household_id).await?;
            let existing = inventory
                .iter()
                .find(|item| same_name(&item.name, &entry.name));

            if let Some(existing) = existing {
                let mut changes = ItemChanges::from(existing);
                changes.name.clone_from(&entry.name);
                changes.quantity = entry.quantity;
                if let Some(expiration_date) = entry.expiration_date {
                    changes.expiration_date = expiration_date;
                }
                changes.storage_location = Some(location.clone());
                changes.predicted_expiration_date = predict_expiration(
                    &changes.name,
                    changes.storage_location.as_deref(),
                    changes.expiration_date,
                );

                self.repos.items.update(existing.id, &changes).await?;
                summary.updated += 1;
            } else if let Some(expiration_date) = entry.expiration_date {
                self.repos
                    .items
                    .create(&NewItem {
                        name: entry.name.clone(),
                        quantity: entry.quantity,
                        expiration_date,
                        predicted_expiration_date: predict_expiration(
                            &entry.name,
                            Some(&location),
                            expiration_date,
                        ),
                        storage_location: Some(location.clone()),
                        household_id,
                        added_by: user.id,
                    })
                    .await?;
                summary.added += 1;
            } else {
                tracing::debug!(name = %entry.name, "Skipping new appliance entry without expiration date");
                summary.skipped += 1;
            }
        }

        tracing::info!(
            added = summary.added,
            updated = summary.updated,
            skipped = summary.skipped,
            "Appliance sync complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::CreateItem;
    use crate::services::testing::{Fixture, date};

    fn reported(name: &str, quantity: i32, expiration_date: Option<chrono::NaiveDate>) -> ApplianceItem {
        ApplianceItem {
            name: name.to_owned(),
            quantity,
            expiration_date,
        }
    }

    #[test]
    fn test_summary_message() {
        let summary = SyncSummary {
            appliance_id: "fridge-1".to_owned(),
            added: 2,
            updated: 1,
            skipped: 4,
        };
        assert_eq!(
            summary.to_string(),
            "Sync complete for appliance fridge-1. Added 2 items, updated 1 items."
        );
    }

    #[tokio::test]
    async fn test_unmatched_entry_without_date_is_skipped() {
        let fixture = Fixture::new().await;
        let summary = fixture
            .appliance()
            .sync(
                fixture.caller(),
                fixture.household.id,
                "fridge-1",
                &[reported("Butter", 1, None)],
            )
            .await
            .unwrap();

        assert_eq!((summary.added, summary.updated, summary.skipped), (0, 0, 1));
        assert!(
            fixture
                .items()
                .items_by_household(fixture.household.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_updates_match_and_adds_new() {
        let fixture = Fixture::new().await;
        let existing = fixture
            .items()
            .create_item(
                fixture.caller(),
                CreateItem {
                    name: "Milk".to_owned(),
                    quantity: 1,
                    expiration_date: date(2025, 6, 20),
                    storage_location: Some("Pantry".to_owned()),
                    household_id: fixture.household.id,
                },
            )
            .await
            .unwrap();

        let summary = fixture
            .appliance()
            .sync(
                fixture.caller(),
                fixture.household.id,
                "fridge-9",
                &[
                    reported("MILK", 3, None),
                    reported("Yogurt", 4, Some(date(2025, 6, 25))),
                ],
            )
            .await
            .unwrap();
        assert_eq!((summary.added, summary.updated, summary.skipped), (1, 1, 0));

        let items = fixture
            .items()
            .items_by_household(fixture.household.id)
            .await
            .unwrap();
        assert_eq!(items.len(), 2);

        let milk = items.iter().find(|i| i.id == existing.id).unwrap();
        assert_eq!(milk.name, "MILK");
        assert_eq!(milk.quantity, 3);
        assert_eq!(milk.expiration_date, date(2025, 6, 20));
        assert_eq!(milk.storage_location.as_deref(), Some("Smart Fridge - fridge-9"));
        assert_eq!(milk.predicted_expiration_date, None);

        let yogurt = items.iter().find(|i| i.name == "Yogurt").unwrap();
        assert_eq!(yogurt.added_by, fixture.user.id);
        assert_eq!(
            yogurt.storage_location.as_deref(),
            Some("Smart Fridge - fridge-9")
        );
    }

    #[tokio::test]
    async fn test_repeated_name_in_one_report_creates_once() {
        let fixture = Fixture::new().await;
        let summary = fixture
            .appliance()
            .sync(
                fixture.caller(),
                fixture.household.id,
                "fridge-2",
                &[
                    reported("Cheese", 1, Some(date(2025, 7, 1))),
                    reported("cheese", 2, Some(date(2025, 7, 3))),
                ],
            )
            .await
            .unwrap();

        assert_eq!((summary.added, summary.updated), (1, 1));
        let items = fixture
            .items()
            .items_by_household(fixture.household.id)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2);
        assert_eq!(items[0].expiration_date, date(2025, 7, 3));
    }

    #[tokio::test]
    async fn test_invalid_entry_rejects_whole_report() {
        let fixture = Fixture::new().await;
        let err = fixture
            .appliance()
            .sync(
                fixture.caller(),
                fixture.household.id,
                "fridge-3",
                &[
                    reported("Cheese", 1, Some(date(2025, 7, 1))),
                    reported("Butter", -1, Some(date(2025, 7, 1))),
                ],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::InvalidArgument(_)));
        assert!(
            fixture
                .items()
                .items_by_household(fixture.household.id)
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_blank_name_after_update_leaves_existing_item_alone() {
        let fixture = Fixture::new().await;
        fixture
            .items()
            .create_item(
                fixture.caller(),
                CreateItem {
                    name: "Milk".to_owned(),
                    quantity: 1,
                    expiration_date: date(2025, 6, 20),
                    storage_location: Some("Fridge".to_owned()),
                    household_id: fixture.household.id,
                },
            )
            .await
            .unwrap();

        let err = fixture
            .appliance()
            .sync(
                fixture.caller(),
                fixture.household.id,
                "fridge-3",
                &[reported("Milk", 5, None), reported("  ", 1, None)],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidArgument(_)));

        let items = fixture
            .items()
            .items_by_household(fixture.household.id)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 1);
        assert_eq!(items[0].storage_location.as_deref(), Some("Fridge"));
    }

    #[tokio::test]
    async fn test_non_ascii_names_match_across_case() {
        let fixture = Fixture::new().await;
        let summary = fixture
            .appliance()
            .sync(
                fixture.caller(),
                fixture.household.id,
                "fridge-4",
                &[
                    reported("crème fraîche", 1, Some(date(2025, 7, 1))),
                    reported("CRÈME FRAÎCHE", 2, None),
                ],
            )
            .await
            .unwrap();

        assert_eq!((summary.added, summary.updated, summary.skipped), (1, 1, 0));
        let items = fixture
            .items()
            .items_by_household(fixture.household.id)
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "CRÈME FRAÎCHE");
        assert_eq!(items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_unknown_household() {
        let fixture = Fixture::new().await;
        let err = fixture
            .appliance()
            .sync(fixture.caller(), HouseholdId::new(31), "f", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
