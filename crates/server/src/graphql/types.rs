//! GraphQL object types.
//!
//! Each object wraps a domain model and resolves its relations lazily
//! through the services in [`AppState`].

use async_graphql::{Context, ID, Object, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};

use freshkeep_core::rules::{Recipe, RecipeSuggestion};

use super::to_id;
use crate::error::GraphqlResultExt;
use crate::models::{Household, Item, ShoppingList, ShoppingListItem, User};
use crate::services::{OcrResult, SustainabilityMetrics};
use crate::state::AppState;

// =============================================================================
// Household
// =============================================================================

/// A household sharing an inventory and a shopping list.
pub struct HouseholdObject(pub Household);

#[Object(name = "Household")]
impl HouseholdObject {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }

    /// Users belonging to this household.
    async fn members(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<UserObject>> {
        let state = ctx.data::<AppState>()?;
        let users = state.accounts().members(self.0.id).await.into_graphql()?;
        Ok(users.into_iter().map(UserObject).collect())
    }

    /// The household's inventory.
    async fn items(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ItemObject>> {
        let state = ctx.data::<AppState>()?;
        let items = state.items().items_by_household(self.0.id).await.into_graphql()?;
        Ok(items.into_iter().map(ItemObject).collect())
    }

    /// The household's shopping list, if one has been created.
    async fn shopping_list(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<ShoppingListObject>> {
        let state = ctx.data::<AppState>()?;
        let list = state.shopping().find_list(self.0.id).await.into_graphql()?;
        Ok(list.map(ShoppingListObject))
    }
}

// =============================================================================
// User
// =============================================================================

/// A household member.
pub struct UserObject(pub User);

#[Object(name = "User")]
impl UserObject {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn email(&self) -> &str {
        self.0.email.as_str()
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    /// Cumulative CO2 saved by consuming items before they expired, in kg.
    async fn total_co2_saved_kg(&self) -> f64 {
        self.0.total_co2_saved_kg
    }

    async fn household(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<HouseholdObject>> {
        let Some(household_id) = self.0.household_id else {
            return Ok(None);
        };
        let state = ctx.data::<AppState>()?;
        let household = state.accounts().household(household_id).await.into_graphql()?;
        Ok(household.map(HouseholdObject))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

// =============================================================================
// Item
// =============================================================================

/// A grocery item in a household's inventory.
pub struct ItemObject(pub Item);

#[Object(name = "Item")]
impl ItemObject {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn quantity(&self) -> i32 {
        self.0.quantity
    }

    /// Date printed on the package.
    async fn expiration_date(&self) -> NaiveDate {
        self.0.expiration_date
    }

    /// Adjusted date from the storage rules, when one applies.
    async fn predicted_expiration_date(&self) -> Option<NaiveDate> {
        self.0.predicted_expiration_date
    }

    async fn storage_location(&self) -> Option<&str> {
        self.0.storage_location.as_deref()
    }

    async fn household(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<HouseholdObject>> {
        let state = ctx.data::<AppState>()?;
        let household = state
            .accounts()
            .household(self.0.household_id)
            .await
            .into_graphql()?;
        Ok(household.map(HouseholdObject))
    }

    /// The user who added the item.
    async fn added_by(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<UserObject>> {
        let state = ctx.data::<AppState>()?;
        let user = state.accounts().get_user(self.0.added_by).await.into_graphql()?;
        Ok(user.map(UserObject))
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

// =============================================================================
// Shopping
// =============================================================================

pub struct ShoppingListObject(pub ShoppingList);

#[Object(name = "ShoppingList")]
impl ShoppingListObject {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn household(&self, ctx: &Context<'_>) -> async_graphql::Result<Option<HouseholdObject>> {
        let state = ctx.data::<AppState>()?;
        let household = state
            .accounts()
            .household(self.0.household_id)
            .await
            .into_graphql()?;
        Ok(household.map(HouseholdObject))
    }

    /// Entries in the order they were added.
    async fn items(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<ShoppingListItemObject>> {
        let state = ctx.data::<AppState>()?;
        let entries = state.shopping().list_items(self.0.id).await.into_graphql()?;
        Ok(entries.into_iter().map(ShoppingListItemObject).collect())
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

pub struct ShoppingListItemObject(pub ShoppingListItem);

#[Object(name = "ShoppingListItem")]
impl ShoppingListItemObject {
    async fn id(&self) -> ID {
        to_id(self.0.id)
    }

    async fn name(&self) -> &str {
        &self.0.name
    }

    async fn quantity(&self) -> i32 {
        self.0.quantity
    }

    async fn is_purchased(&self) -> bool {
        self.0.is_purchased
    }

    async fn shopping_list_id(&self) -> ID {
        to_id(self.0.shopping_list_id)
    }

    async fn created_at(&self) -> DateTime<Utc> {
        self.0.created_at
    }

    async fn updated_at(&self) -> DateTime<Utc> {
        self.0.updated_at
    }
}

// =============================================================================
// Plain results
// =============================================================================

#[derive(SimpleObject)]
#[graphql(name = "SustainabilityMetrics")]
pub struct SustainabilityMetricsObject {
    pub total_co2_saved_kg: f64,
}

impl From<SustainabilityMetrics> for SustainabilityMetricsObject {
    fn from(metrics: SustainabilityMetrics) -> Self {
        Self {
            total_co2_saved_kg: metrics.total_co2_saved_kg,
        }
    }
}

/// Item details read from a receipt or label photo.
#[derive(SimpleObject)]
#[graphql(name = "OCRResult")]
pub struct OcrResultObject {
    pub name: String,
    pub quantity: i32,
    pub expiration_date: Option<NaiveDate>,
}

impl From<OcrResult> for OcrResultObject {
    fn from(result: OcrResult) -> Self {
        Self {
            name: result.name,
            quantity: result.quantity,
            expiration_date: result.expiration_date,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(name = "Recipe")]
pub struct RecipeObject {
    pub name: String,
    pub ingredients: Vec<String>,
    pub prep_time_minutes: u32,
    pub cook_time_minutes: u32,
    pub rating_average: Option<f64>,
    pub view_count: u32,
}

impl From<&Recipe> for RecipeObject {
    fn from(recipe: &Recipe) -> Self {
        Self {
            name: recipe.name.to_owned(),
            ingredients: recipe.ingredients.iter().map(|&i| i.to_owned()).collect(),
            prep_time_minutes: recipe.prep_time_minutes,
            cook_time_minutes: recipe.cook_time_minutes,
            rating_average: recipe.rating_average,
            view_count: recipe.view_count,
        }
    }
}

/// A recipe ranked by how well it uses up expiring items.
#[derive(SimpleObject)]
#[graphql(name = "RecipeSuggestion")]
pub struct RecipeSuggestionObject {
    pub recipe: RecipeObject,
    pub score: f64,
    pub matched_ingredients: Vec<String>,
    pub missing_ingredients: Vec<String>,
    pub match_percentage: f64,
    /// Items expiring within 3 days that the recipe uses.
    pub urgent_items_used: u32,
}

impl From<RecipeSuggestion<'_>> for RecipeSuggestionObject {
    fn from(suggestion: RecipeSuggestion<'_>) -> Self {
        Self {
            recipe: suggestion.recipe.into(),
            score: suggestion.score,
            matched_ingredients: suggestion.matched_ingredients,
            missing_ingredients: suggestion.missing_ingredients,
            match_percentage: suggestion.match_percentage,
            urgent_items_used: suggestion.urgent_items_used,
        }
    }
}
