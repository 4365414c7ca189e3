//! Admin user management: listing and status changes.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use serde_json::Value;

use taskhub_core::error::AppError;

use crate::dto::request::{StatusUpdateRequest, UserListQuery};
use crate::dto::response::{StatusUpdateResponse, UserListResponse};
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<UserListQuery>,
) -> Result<Json<UserListResponse>, AppError> {
    require_admin(&auth)?;

    let filter = query.filter()?;
    let page = state
        .admin_user_service
        .list_users(auth.context(), &filter, query.page_request())
        .await?;

    Ok(Json(page.into()))
}

/// PUT /api/users/status
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<StatusUpdateResponse>, AppError> {
    require_admin(&auth)?;

    let req = StatusUpdateRequest::from_body(body)?;
    let outcome = state
        .revocation
        .set_status(auth.context(), req.id, &req.status)
        .await?;

    Ok(Json(StatusUpdateResponse {
        message: format!("User status updated to {}", outcome.user.status),
        user: outcome.user,
    }))
}
