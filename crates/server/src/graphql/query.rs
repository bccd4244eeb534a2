//! Query root.

use async_graphql::{Context, ID, Object};

use super::types::{
    HouseholdObject, ItemObject, RecipeSuggestionObject, ShoppingListObject,
    SustainabilityMetricsObject, UserObject,
};
use super::{parse_id, require_caller};
use crate::error::GraphqlResultExt;
use crate::state::AppState;

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Look up an item by ID.
    async fn item(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<ItemObject>> {
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id).into_graphql()?;
        let item = state.items().get_item(id).await.into_graphql()?;
        Ok(item.map(ItemObject))
    }

    /// All items of a household.
    async fn items_by_household(
        &self,
        ctx: &Context<'_>,
        household_id: ID,
    ) -> async_graphql::Result<Vec<ItemObject>> {
        let state = ctx.data::<AppState>()?;
        let household_id = parse_id(&household_id).into_graphql()?;
        let items = state
            .items()
            .items_by_household(household_id)
            .await
            .into_graphql()?;
        Ok(items.into_iter().map(ItemObject).collect())
    }

    /// Items expiring within `daysAhead` days, soonest first.
    async fn expiring_items(
        &self,
        ctx: &Context<'_>,
        household_id: ID,
        #[graphql(default = 7)] days_ahead: i32,
    ) -> async_graphql::Result<Vec<ItemObject>> {
        let state = ctx.data::<AppState>()?;
        let household_id = parse_id(&household_id).into_graphql()?;
        let items = state
            .items()
            .expiring_items(household_id, days_ahead)
            .await
            .into_graphql()?;
        Ok(items.into_iter().map(ItemObject).collect())
    }

    /// Recipes that use up items expiring within `daysAhead` days, best
    /// match first.
    async fn recipe_suggestions(
        &self,
        ctx: &Context<'_>,
        household_id: ID,
        #[graphql(default = 7)] days_ahead: i32,
    ) -> async_graphql::Result<Vec<RecipeSuggestionObject>> {
        let state = ctx.data::<AppState>()?;
        let household_id = parse_id(&household_id).into_graphql()?;
        let suggestions = state
            .items()
            .recipe_suggestions(household_id, days_ahead)
            .await
            .into_graphql()?;
        Ok(suggestions.into_iter().map(Into::into).collect())
    }

    async fn all_households(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<HouseholdObject>> {
        let state = ctx.data::<AppState>()?;
        let households = state.accounts().all_households().await.into_graphql()?;
        Ok(households.into_iter().map(HouseholdObject).collect())
    }

    async fn household(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<HouseholdObject>> {
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id).into_graphql()?;
        let household = state.accounts().household(id).await.into_graphql()?;
        Ok(household.map(HouseholdObject))
    }

    async fn user(&self, ctx: &Context<'_>, id: ID) -> async_graphql::Result<Option<UserObject>> {
        let state = ctx.data::<AppState>()?;
        let id = parse_id(&id).into_graphql()?;
        let user = state.accounts().get_user(id).await.into_graphql()?;
        Ok(user.map(UserObject))
    }

    async fn user_by_email(
        &self,
        ctx: &Context<'_>,
        email: String,
    ) -> async_graphql::Result<Option<UserObject>> {
        let state = ctx.data::<AppState>()?;
        let user = state
            .accounts()
            .get_user_by_email(&email)
            .await
            .into_graphql()?;
        Ok(user.map(UserObject))
    }

    /// The calling user.
    async fn me(&self, ctx: &Context<'_>) -> async_graphql::Result<UserObject> {
        let state = ctx.data::<AppState>()?;
        let caller = require_caller(ctx).into_graphql()?;
        let user = state.accounts().me(caller).await.into_graphql()?;
        Ok(UserObject(user))
    }

    /// The household's shopping list, created on first access.
    async fn shopping_list_by_household(
        &self,
        ctx: &Context<'_>,
        household_id: ID,
    ) -> async_graphql::Result<ShoppingListObject> {
        let state = ctx.data::<AppState>()?;
        let household_id = parse_id(&household_id).into_graphql()?;
        let list = state
            .shopping()
            .get_or_create_list(household_id)
            .await
            .into_graphql()?;
        Ok(ShoppingListObject(list))
    }

    async fn smart_shopping_suggestions(
        &self,
        ctx: &Context<'_>,
        household_id: ID,
    ) -> async_graphql::Result<Vec<String>> {
        let state = ctx.data::<AppState>()?;
        let household_id = parse_id(&household_id).into_graphql()?;
        state
            .shopping()
            .smart_suggestions(household_id)
            .await
            .into_graphql()
    }

    /// The calling user's CO2 savings.
    async fn sustainability_metrics(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<SustainabilityMetricsObject> {
        let state = ctx.data::<AppState>()?;
        let caller = require_caller(ctx).into_graphql()?;
        let metrics = state
            .accounts()
            .sustainability_metrics(caller)
            .await
            .into_graphql()?;
        Ok(metrics.into())
    }
}
