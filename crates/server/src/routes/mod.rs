//! HTTP routes.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health        - Liveness check
//! GET  /health/ready  - Readiness check (database reachable)
//! POST /graphql       - GraphQL endpoint
//! GET  /graphql       - GraphiQL IDE (when enabled)
//! ```

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::graphql::{self, build_schema};
use crate::state::AppState;

/// Build the application router.
///
/// Sentry layers are added by the binary on top of this.
pub fn router(state: AppState, graphiql: bool) -> Router {
    let schema = build_schema(state.clone());

    let graphql_route = if graphiql {
        get(graphql::graphiql).post(graphql::graphql_handler)
    } else {
        post(graphql::graphql_handler)
    };

    let health = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .with_state(state);

    let api = Router::new()
        .route("/graphql", graphql_route)
        .with_state(schema);

    health.merge(api).layer(
        TraceLayer::new_for_http()
            .make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    status = tracing::field::Empty,
                    latency_ms = tracing::field::Empty,
                )
            })
            .on_response(
                |response: &axum::http::Response<_>, latency: std::time::Duration, span: &Span| {
                    span.record("status", response.status().as_u16());
                    span.record(
                        "latency_ms",
                        u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                    );
                    DefaultOnResponse::default().on_response(response, latency, span);
                },
            ),
    )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    let Some(pool) = state.pool() else {
        return StatusCode::OK;
    };
    match sqlx::query("SELECT 1").fetch_one(pool).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
