//! Task entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::status::TaskStatus;

/// A tracked task.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: Uuid,
    /// Short title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Current status.
    pub status: TaskStatus,
    /// When the task was created.
    pub created_at: DateTime<Utc>,
    /// When the task was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Build a fresh record from creation data.
    pub fn from_create(data: &CreateTask) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: data.title.clone(),
            description: data.description.clone(),
            status: data.status,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Data required to create a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTask {
    /// Short title.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Initial status.
    #[serde(default)]
    pub status: TaskStatus,
}

/// One entry of a bulk status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatusUpdate {
    /// The task to update.
    pub id: Uuid,
    /// The new status.
    pub status: TaskStatus,
}
