//! Route definitions for the TaskHub HTTP API.
//!
//! REST routes are mounted under `/api`; the realtime channel lives at
//! `/ws`. The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, patch, post, put},
};
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(user_routes())
        .merge(task_routes())
        .route("/health", get(handlers::health::health));

    let ws_routes = Router::new().route("/ws", get(handlers::ws::ws_upgrade));

    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    Router::new()
        .nest("/api", api_routes)
        .merge(ws_routes)
        .layer(DefaultBodyLimit::max(state.config.server.max_body_bytes))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Registration, login, and admin user management
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/register", post(handlers::auth::register))
        .route("/users/login", post(handlers::auth::login))
        .route("/users", get(handlers::users::list_users))
        .route("/users/status", put(handlers::users::update_status))
}

/// Task listing and bulk updates
fn task_routes() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(handlers::tasks::list_tasks))
        .route("/tasks/bulk", patch(handlers::tasks::bulk_update))
}
