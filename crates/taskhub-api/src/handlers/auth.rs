//! Auth handlers: register and login.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;

use taskhub_core::error::AppError;

use crate::dto::request::{LoginRequest, RegisterRequest, json_body, validate_request};
use crate::dto::response::{LoginResponse, TokenResponse};
use crate::state::AppState;

/// POST /api/users/register
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let req = json_body(body)?;
    validate_request(&req)?;

    let session = state
        .user_service
        .register(&req.name, &req.email, &req.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TokenResponse {
            token: session.token,
        }),
    ))
}

/// POST /api/users/login
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let req = json_body(body)?;
    validate_request(&req)?;

    let session = state.user_service.login(&req.email, &req.password).await?;

    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: session.user,
    }))
}
