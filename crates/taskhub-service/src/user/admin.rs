//! Admin user listing.

use std::sync::Arc;

use tracing::debug;

use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_database::{UserFilter, UserStore};
use taskhub_entity::user::User;

use crate::context::RequestContext;

/// Read-side user administration.
#[derive(Debug, Clone)]
pub struct AdminUserService {
    users: Arc<dyn UserStore>,
}

impl AdminUserService {
    /// Creates a new admin user service.
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Lists users matching `filter`, newest first.
    pub async fn list_users(
        &self,
        ctx: &RequestContext,
        filter: &UserFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<User>> {
        ctx.require_admin()?;

        let result = self.users.find(filter, &page).await?;
        debug!(
            admin_id = %ctx.user_id,
            page = page.page,
            total = result.total_items,
            "Listed users"
        );
        Ok(result)
    }
}
