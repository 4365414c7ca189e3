use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_entity::task::{CreateTask, Task, TaskStatusUpdate};

use super::paginate;
use crate::store::TaskStore;

/// In-memory [`TaskStore`].
#[derive(Debug, Default)]
pub struct MemoryTaskStore {
    tasks: DashMap<Uuid, Task>,
}

impl MemoryTaskStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskStore for MemoryTaskStore {
    async fn find(&self, page: &PageRequest) -> AppResult<PageResponse<Task>> {
        let mut tasks: Vec<Task> = self.tasks.iter().map(|t| t.value().clone()).collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(tasks, page))
    }

    async fn create(&self, data: &CreateTask) -> AppResult<Task> {
        let task = Task::from_create(data);
        self.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn bulk_update_status(&self, updates: &[TaskStatusUpdate]) -> AppResult<u64> {
        let now = Utc::now();
        let mut updated = 0;
        for update in updates {
            if let Some(mut task) = self.tasks.get_mut(&update.id) {
                task.status = update.status;
                task.updated_at = now;
                updated += 1;
            }
        }
        Ok(updated)
    }
}
