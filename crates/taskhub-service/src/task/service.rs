//! Task listing and bulk status updates.

use std::sync::Arc;

use tracing::info;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_database::TaskStore;
use taskhub_entity::task::{Task, TaskStatusUpdate};

use crate::context::RequestContext;

/// Upper bound on entries in one bulk update.
pub const MAX_BULK_UPDATE: usize = 500;

/// Task operations available to any authenticated user.
#[derive(Debug, Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    /// Creates a new task service.
    pub fn new(tasks: Arc<dyn TaskStore>) -> Self {
        Self { tasks }
    }

    /// Page through tasks, newest first.
    pub async fn list(&self, _ctx: &RequestContext, page: PageRequest) -> AppResult<PageResponse<Task>> {
        self.tasks.find(&page).await
    }

    /// Apply a batch of status changes. Unknown ids are skipped.
    pub async fn bulk_update(
        &self,
        ctx: &RequestContext,
        updates: &[TaskStatusUpdate],
    ) -> AppResult<u64> {
        if updates.is_empty() {
            return Err(AppError::validation("At least one task update is required"));
        }
        if updates.len() > MAX_BULK_UPDATE {
            return Err(AppError::validation(format!(
                "At most {MAX_BULK_UPDATE} task updates are allowed per request"
            )));
        }

        let updated = self.tasks.bulk_update_status(updates).await?;
        info!(
            user_id = %ctx.user_id,
            requested = updates.len(),
            updated,
            "Bulk task update"
        );
        Ok(updated)
    }
}
