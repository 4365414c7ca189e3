//! Persistence traits consumed by the service layer.

use async_trait::async_trait;
use uuid::Uuid;

use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_entity::task::{CreateTask, Task, TaskStatusUpdate};
use taskhub_entity::user::{CreateUser, User, UserRole, UserStatus};

/// Optional filters for user listings.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Only users with this status.
    pub status: Option<UserStatus>,
    /// Only users with this role.
    pub role: Option<UserRole>,
    /// Case-insensitive substring matched against name and email.
    pub search: Option<String>,
}

impl UserFilter {
    /// The search term, if it is non-blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// User persistence.
///
/// Every read goes to the backing store; implementations must not cache.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// List users matching `filter`, newest first.
    async fn find(&self, filter: &UserFilter, page: &PageRequest)
    -> AppResult<PageResponse<User>>;

    /// Fetch one user by id.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Fetch one user by email, ignoring case.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Insert a new user. Duplicate email is a `Conflict`.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Persist profile fields (`name`, `email`, `password_hash`, `role`,
    /// `last_login_at`). Never writes `status` or `token_version`.
    async fn save(&self, user: &User) -> AppResult<User>;

    /// Set `status` and increment `token_version` by one in a single atomic
    /// write. Returns the updated record, or `None` when the id is unknown.
    async fn set_status_and_revoke(&self, id: Uuid, status: UserStatus)
    -> AppResult<Option<User>>;
}

/// Task persistence.
#[async_trait]
pub trait TaskStore: Send + Sync + std::fmt::Debug + 'static {
    /// List tasks, newest first.
    async fn find(&self, page: &PageRequest) -> AppResult<PageResponse<Task>>;

    /// Insert a new task.
    async fn create(&self, data: &CreateTask) -> AppResult<Task>;

    /// Apply every status update; unknown ids are skipped. Returns the number
    /// of tasks changed.
    async fn bulk_update_status(&self, updates: &[TaskStatusUpdate]) -> AppResult<u64>;
}
