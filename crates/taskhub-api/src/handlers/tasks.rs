//! Task listing and bulk status updates.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};

use taskhub_core::error::AppError;
use taskhub_entity::task::TaskStatusUpdate;

use crate::dto::request::{TASK_PAGE_SIZE, json_body};
use crate::dto::response::{BulkUpdateResponse, TaskListResponse};
use crate::extractors::{AuthUser, PaginationParams};
use crate::state::AppState;

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> Result<Json<TaskListResponse>, AppError> {
    let page = state
        .task_service
        .list(auth.context(), params.into_page_request(TASK_PAGE_SIZE))
        .await?;
    Ok(Json(page.into()))
}

/// PATCH /api/tasks/bulk
pub async fn bulk_update(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<Vec<TaskStatusUpdate>>, JsonRejection>,
) -> Result<Json<BulkUpdateResponse>, AppError> {
    let updates = json_body(body)?;
    let updated = state.task_service.bulk_update(auth.context(), &updates).await?;

    Ok(Json(BulkUpdateResponse {
        message: "Tasks updated".to_string(),
        updated,
    }))
}
