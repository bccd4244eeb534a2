//! GraphQL API.
//!
//! Served on `POST /graphql`; the GraphiQL IDE is served on `GET /graphql`
//! when enabled. Resolvers parse and validate transport-level input (IDs,
//! `YYYY-MM-DD` dates), then hand off to the services.
//!
//! # Caller identity
//!
//! There is no authentication. The handler reads the acting user's ID from
//! the `X-User-Id` header and attaches it to the request as a [`Caller`].
//! Operations that act on behalf of a user fail with `UNAUTHENTICATED` when
//! it is missing.

mod inputs;
mod mutation;
mod query;
mod types;

use std::str::FromStr;

use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, ID, Schema};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};
use chrono::NaiveDate;

use freshkeep_core::UserId;

pub use inputs::{
    AddItemToShoppingListInput, ApplianceItemInput, CreateItemInput, CreateUserInput,
    SyncApplianceInput, UpdateItemInput,
};
pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use types::{
    HouseholdObject, ItemObject, OcrResultObject, ShoppingListItemObject, ShoppingListObject,
    SustainabilityMetricsObject, UserObject,
};

use crate::error::{AppError, set_sentry_user};
use crate::services::{Caller, ServiceError};
use crate::state::AppState;

/// Header carrying the acting user's ID.
pub const CALLER_HEADER: &str = "x-user-id";

/// The Freshkeep GraphQL schema.
pub type FreshkeepSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema over the given application state.
#[must_use]
pub fn build_schema(state: AppState) -> FreshkeepSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(state)
        .finish()
}

/// Execute a GraphQL request, attaching the caller from `X-User-Id`.
pub async fn graphql_handler(
    State(schema): State<FreshkeepSchema>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    if let Some(caller) = caller_from_headers(&headers) {
        set_sentry_user(&caller.user_id);
        request = request.data(caller);
    }
    schema.execute(request).await.into()
}

/// Serve the GraphiQL IDE.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

/// Read the caller from request headers.
///
/// A missing or unparseable header yields no caller.
#[must_use]
pub fn caller_from_headers(headers: &HeaderMap) -> Option<Caller> {
    let raw = headers.get(CALLER_HEADER)?.to_str().ok()?;
    match raw.parse::<UserId>() {
        Ok(user_id) => Some(Caller::new(user_id)),
        Err(e) => {
            tracing::debug!(error = %e, "Ignoring malformed caller header");
            None
        }
    }
}

// =============================================================================
// Resolver Helpers
// =============================================================================

/// The caller attached to this request.
pub(crate) fn require_caller(ctx: &Context<'_>) -> Result<Caller, AppError> {
    ctx.data_opt::<Caller>()
        .copied()
        .ok_or(AppError::Service(ServiceError::Unauthenticated))
}

/// Parse a GraphQL `ID` into a typed ID.
pub(crate) fn parse_id<T: FromStr>(id: &ID) -> Result<T, AppError> {
    id.as_str()
        .trim()
        .parse::<T>()
        .map_err(|_| AppError::InvalidArgument(format!("Invalid ID: {:?}.", id.as_str())))
}

/// Render a typed ID as a GraphQL `ID`.
pub(crate) fn to_id(id: impl std::fmt::Display) -> ID {
    ID(id.to_string())
}

/// Parse a `YYYY-MM-DD` date.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::InvalidArgument("Invalid date format. Expected YYYY-MM-DD.".to_owned())
    })
}
