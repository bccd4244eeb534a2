//! GraphQL input types and their conversion into service inputs.

use async_graphql::{ID, InputObject};

use freshkeep_core::{HouseholdId, ItemId};

use super::{parse_date, parse_id};
use crate::error::AppError;
use crate::models::ApplianceItem;
use crate::services::{CreateItem, SignUp, UpdateItem};

#[derive(Debug, InputObject)]
pub struct CreateUserInput {
    pub email: String,
    pub password: String,
    pub name: String,
    /// Found a new household and join it.
    pub household_name: Option<String>,
}

impl From<CreateUserInput> for SignUp {
    fn from(input: CreateUserInput) -> Self {
        Self {
            email: input.email,
            password: input.password,
            name: input.name,
            household_name: input.household_name,
        }
    }
}

#[derive(Debug, InputObject)]
pub struct CreateItemInput {
    pub name: String,
    pub quantity: i32,
    /// `YYYY-MM-DD`
    pub expiration_date: String,
    pub storage_location: Option<String>,
    pub household_id: ID,
}

impl CreateItemInput {
    pub(crate) fn into_service(self) -> Result<CreateItem, AppError> {
        Ok(CreateItem {
            expiration_date: parse_date(&self.expiration_date)?,
            household_id: parse_id(&self.household_id)?,
            name: self.name,
            quantity: self.quantity,
            storage_location: self.storage_location,
        })
    }
}

/// Partial update; omitted fields keep their stored values.
#[derive(Debug, InputObject)]
pub struct UpdateItemInput {
    pub item_id: ID,
    pub name: Option<String>,
    pub quantity: Option<i32>,
    /// `YYYY-MM-DD`
    pub expiration_date: Option<String>,
    pub storage_location: Option<String>,
}

impl UpdateItemInput {
    pub(crate) fn into_service(self) -> Result<(ItemId, UpdateItem), AppError> {
        let item_id = parse_id(&self.item_id)?;
        let expiration_date = self
            .expiration_date
            .as_deref()
            .map(parse_date)
            .transpose()?;
        Ok((
            item_id,
            UpdateItem {
                name: self.name,
                quantity: self.quantity,
                expiration_date,
                storage_location: self.storage_location,
            },
        ))
    }
}

#[derive(Debug, InputObject)]
pub struct AddItemToShoppingListInput {
    pub list_id: ID,
    pub name: String,
    #[graphql(default = 1)]
    pub quantity: i32,
}

#[derive(Debug, InputObject)]
pub struct ApplianceItemInput {
    pub name: String,
    pub quantity: i32,
    /// `YYYY-MM-DD`; entries without one can only update existing items.
    pub expiration_date: Option<String>,
}

impl ApplianceItemInput {
    fn into_model(self) -> Result<ApplianceItem, AppError> {
        let expiration_date = match self.expiration_date.as_deref() {
            Some(raw) => Some(parse_date(raw).map_err(|_| {
                AppError::InvalidArgument(format!(
                    "Invalid date format for item {}. Expected YYYY-MM-DD.",
                    self.name
                ))
            })?),
            None => None,
        };
        Ok(ApplianceItem {
            name: self.name,
            quantity: self.quantity,
            expiration_date,
        })
    }
}

#[derive(Debug, InputObject)]
pub struct SyncApplianceInput {
    pub household_id: ID,
    pub appliance_id: String,
    pub items: Vec<ApplianceItemInput>,
}

impl SyncApplianceInput {
    /// Validate every entry before any of them is applied.
    pub(crate) fn into_entries(self) -> Result<SyncRequest, AppError> {
        let household_id = parse_id(&self.household_id)?;
        let entries = self
            .items
            .into_iter()
            .map(ApplianceItemInput::into_model)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SyncRequest {
            household_id,
            appliance_id: self.appliance_id,
            entries,
        })
    }
}

/// A parsed appliance sync request.
pub(crate) struct SyncRequest {
    pub household_id: HouseholdId,
    pub appliance_id: String,
    pub entries: Vec<ApplianceItem>,
}
