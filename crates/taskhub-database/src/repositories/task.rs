//! PostgreSQL task repository.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use taskhub_core::error::{AppError, ErrorKind};
use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_entity::task::{CreateTask, Task, TaskStatusUpdate};

use crate::store::TaskStore;

/// sqlx-backed [`TaskStore`].
#[derive(Debug, Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create a new task repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskStore for TaskRepository {
    async fn find(&self, page: &PageRequest) -> AppResult<PageResponse<Task>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count tasks", e))?;

        let tasks = sqlx::query_as::<_, Task>(
            "SELECT * FROM tasks ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list tasks", e))?;

        Ok(PageResponse::new(tasks, page, total as u64))
    }

    async fn create(&self, data: &CreateTask) -> AppResult<Task> {
        sqlx::query_as::<_, Task>(
            "INSERT INTO tasks (title, description, status) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(&data.title)
        .bind(&data.description)
        .bind(data.status)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create task", e))
    }

    async fn bulk_update_status(&self, updates: &[TaskStatusUpdate]) -> AppResult<u64> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to start transaction", e)
        })?;

        let mut updated = 0u64;
        for update in updates {
            let result =
                sqlx::query("UPDATE tasks SET status = $2, updated_at = NOW() WHERE id = $1")
                    .bind(update.id)
                    .bind(update.status)
                    .execute(&mut *tx)
                    .await
                    .map_err(|e| {
                        AppError::with_source(ErrorKind::Database, "Failed to update task", e)
                    })?;
            updated += result.rows_affected();
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit task updates", e)
        })?;

        debug!(requested = updates.len(), updated, "Bulk task status update committed");
        Ok(updated)
    }
}
