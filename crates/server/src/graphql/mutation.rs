//! Mutation root.

use async_graphql::{Context, ID, Object};

use super::inputs::{
    AddItemToShoppingListInput, CreateItemInput, CreateUserInput, SyncApplianceInput,
    UpdateItemInput,
};
use super::types::{ItemObject, OcrResultObject, ShoppingListItemObject, UserObject};
use super::{parse_id, require_caller};
use crate::error::GraphqlResultExt;
use crate::services::process_image;
use crate::state::AppState;

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register a user, optionally founding a household.
    async fn create_user(
        &self,
        ctx: &Context<'_>,
        input: CreateUserInput,
    ) -> async_graphql::Result<UserObject> {
        let state = ctx.data::<AppState>()?;
        let user = state
            .accounts()
            .create_user(input.into())
            .await
            .into_graphql()?;
        Ok(UserObject(user))
    }

    /// Add an item to a household's inventory.
    async fn create_item(
        &self,
        ctx: &Context<'_>,
        input: CreateItemInput,
    ) -> async_graphql::Result<ItemObject> {
        let state = ctx.data::<AppState>()?;
        let caller = require_caller(ctx).into_graphql()?;
        let input = input.into_service().into_graphql()?;
        let item = state
            .items()
            .create_item(caller, input)
            .await
            .into_graphql()?;
        Ok(ItemObject(item))
    }

    /// Change some fields of an item.
    async fn update_item(
        &self,
        ctx: &Context<'_>,
        input: UpdateItemInput,
    ) -> async_graphql::Result<ItemObject> {
        let state = ctx.data::<AppState>()?;
        let (item_id, update) = input.into_service().into_graphql()?;
        let item = state
            .items()
            .update_item(item_id, update)
            .await
            .into_graphql()?;
        Ok(ItemObject(item))
    }

    /// Delete an item. Returns `false` if it didn't exist.
    async fn delete_item(&self, ctx: &Context<'_>, item_id: ID) -> async_graphql::Result<bool> {
        let state = ctx.data::<AppState>()?;
        let item_id = parse_id(&item_id).into_graphql()?;
        state.items().delete_item(item_id).await.into_graphql()
    }

    /// Consume an item, crediting the caller with the CO2 it saved.
    ///
    /// Returns the item as it was before removal.
    async fn mark_item_as_used(
        &self,
        ctx: &Context<'_>,
        item_id: ID,
    ) -> async_graphql::Result<ItemObject> {
        let state = ctx.data::<AppState>()?;
        let caller = require_caller(ctx).into_graphql()?;
        let item_id = parse_id(&item_id).into_graphql()?;
        let consumption = state
            .items()
            .mark_item_as_used(item_id, caller)
            .await
            .into_graphql()?;
        Ok(ItemObject(consumption.item))
    }

    async fn add_item_to_shopping_list(
        &self,
        ctx: &Context<'_>,
        input: AddItemToShoppingListInput,
    ) -> async_graphql::Result<ShoppingListItemObject> {
        let state = ctx.data::<AppState>()?;
        let list_id = parse_id(&input.list_id).into_graphql()?;
        let entry = state
            .shopping()
            .add_item(list_id, &input.name, input.quantity)
            .await
            .into_graphql()?;
        Ok(ShoppingListItemObject(entry))
    }

    /// Flip a shopping list entry between purchased and not purchased.
    async fn toggle_shopping_list_item(
        &self,
        ctx: &Context<'_>,
        item_id: ID,
    ) -> async_graphql::Result<ShoppingListItemObject> {
        let state = ctx.data::<AppState>()?;
        let item_id = parse_id(&item_id).into_graphql()?;
        let entry = state
            .shopping()
            .toggle_purchased(item_id)
            .await
            .into_graphql()?;
        Ok(ShoppingListItemObject(entry))
    }

    /// Delete a shopping list with all its entries.
    async fn delete_shopping_list(
        &self,
        ctx: &Context<'_>,
        list_id: ID,
    ) -> async_graphql::Result<bool> {
        let state = ctx.data::<AppState>()?;
        let list_id = parse_id(&list_id).into_graphql()?;
        state.shopping().delete_list(list_id).await.into_graphql()
    }

    /// Reconcile the inventory with a smart appliance's report.
    async fn sync_appliance_data(
        &self,
        ctx: &Context<'_>,
        input: SyncApplianceInput,
    ) -> async_graphql::Result<String> {
        let state = ctx.data::<AppState>()?;
        let caller = require_caller(ctx).into_graphql()?;
        let request = input.into_entries().into_graphql()?;
        let summary = state
            .appliance()
            .sync(
                caller,
                request.household_id,
                &request.appliance_id,
                &request.entries,
            )
            .await
            .into_graphql()?;
        Ok(summary.to_string())
    }

    /// Read item details from a base64-encoded photo.
    #[graphql(name = "processImageForOCR")]
    async fn process_image_for_ocr(
        &self,
        ctx: &Context<'_>,
        image_base64: String,
    ) -> async_graphql::Result<OcrResultObject> {
        let state = ctx.data::<AppState>()?;
        Ok(process_image(&image_base64, state.clock().today()).into())
    }
}
