use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use uuid::Uuid;

use taskhub_core::error::AppError;
use taskhub_core::result::AppResult;
use taskhub_core::types::pagination::{PageRequest, PageResponse};
use taskhub_entity::user::{CreateUser, User, UserStatus};

use super::paginate;
use crate::store::{UserFilter, UserStore};

/// In-memory [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
    /// Lowercased email -> user id.
    emails: DashMap<String, Uuid>,
}

impl MemoryUserStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(user: &User, filter: &UserFilter) -> bool {
    if filter.status.is_some_and(|s| s != user.status) {
        return false;
    }
    if filter.role.is_some_and(|r| r != user.role) {
        return false;
    }
    match filter.search_term() {
        Some(term) => {
            let term = term.to_lowercase();
            user.name.to_lowercase().contains(&term) || user.email.to_lowercase().contains(&term)
        }
        None => true,
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find(
        &self,
        filter: &UserFilter,
        page: &PageRequest,
    ) -> AppResult<PageResponse<User>> {
        let mut users: Vec<User> = self
            .users
            .iter()
            .filter(|entry| matches(entry.value(), filter))
            .map(|entry| entry.value().clone())
            .collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(paginate(users, page))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let Some(id) = self.emails.get(&email.to_lowercase()).map(|id| *id) else {
            return Ok(None);
        };
        self.find_by_id(id).await
    }

    async fn create(&self, data: &CreateUser) -> AppResult<User> {
        let user = User::from_create(data);
        match self.emails.entry(user.email.to_lowercase()) {
            Entry::Occupied(_) => {
                return Err(AppError::conflict(format!(
                    "Email '{}' is already registered",
                    data.email
                )));
            }
            Entry::Vacant(slot) => {
                slot.insert(user.id);
            }
        }
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save(&self, user: &User) -> AppResult<User> {
        let mut stored = self
            .users
            .get_mut(&user.id)
            .ok_or_else(|| AppError::not_found(format!("User {} not found", user.id)))?;

        let old_key = stored.email.to_lowercase();
        let new_key = user.email.to_lowercase();
        if old_key != new_key {
            match self.emails.entry(new_key) {
                Entry::Occupied(_) => {
                    return Err(AppError::conflict(format!(
                        "Email '{}' is already registered",
                        user.email
                    )));
                }
                Entry::Vacant(slot) => {
                    slot.insert(user.id);
                }
            }
            self.emails.remove(&old_key);
        }

        stored.name = user.name.clone();
        stored.email = user.email.clone();
        stored.password_hash = user.password_hash.clone();
        stored.role = user.role;
        stored.last_login_at = user.last_login_at;
        stored.updated_at = Utc::now();
        Ok(stored.clone())
    }

    async fn set_status_and_revoke(
        &self,
        id: Uuid,
        status: UserStatus,
    ) -> AppResult<Option<User>> {
        // The shard write lock makes the read and the increment one step.
        Ok(self.users.get_mut(&id).map(|mut user| {
            user.status = status;
            user.token_version += 1;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use taskhub_core::ErrorKind;
    use taskhub_entity::user::UserRole;

    use super::*;

    fn new_user(name: &str, email: &str, role: UserRole) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_email_ignores_case() {
        let store = MemoryUserStore::new();
        let created = store
            .create(&new_user("Ada", "Ada@Example.com", UserRole::User))
            .await
            .unwrap();

        let found = store.find_by_email("ada@example.COM").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryUserStore::new();
        store
            .create(&new_user("Ada", "ada@example.com", UserRole::User))
            .await
            .unwrap();
        let err = store
            .create(&new_user("Other", "ADA@example.com", UserRole::User))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        let all = store
            .find(&UserFilter::default(), &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_items, 1);
    }

    #[tokio::test]
    async fn test_save_never_touches_status_or_version() {
        let store = MemoryUserStore::new();
        let user = store
            .create(&new_user("Ada", "ada@example.com", UserRole::User))
            .await
            .unwrap();

        let mut stale = user.clone();
        stale.status = UserStatus::Inactive;
        stale.token_version = 42;
        stale.last_login_at = Some(Utc::now());
        let saved = store.save(&stale).await.unwrap();

        assert_eq!(saved.status, UserStatus::Active);
        assert_eq!(saved.token_version, 0);
        assert!(saved.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_set_status_and_revoke_bumps_version() {
        let store = MemoryUserStore::new();
        let user = store
            .create(&new_user("Ada", "ada@example.com", UserRole::User))
            .await
            .unwrap();

        let updated = store
            .set_status_and_revoke(user.id, UserStatus::Inactive)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, UserStatus::Inactive);
        assert_eq!(updated.token_version, 1);

        // Same status again still advances the counter.
        let again = store
            .set_status_and_revoke(user.id, UserStatus::Inactive)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(again.token_version, 2);

        assert!(
            store
                .set_status_and_revoke(Uuid::new_v4(), UserStatus::Active)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_revocations_all_land() {
        let store = Arc::new(MemoryUserStore::new());
        let user = store
            .create(&new_user("Ada", "ada@example.com", UserRole::User))
            .await
            .unwrap();
        let id = user.id;

        let tasks = (0..50).map(|i| {
            let store = Arc::clone(&store);
            let status = if i % 2 == 0 {
                UserStatus::Inactive
            } else {
                UserStatus::Active
            };
            tokio::spawn(async move { store.set_status_and_revoke(id, status).await })
        });
        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }

        let final_user = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(final_user.token_version, 50);
    }

    #[tokio::test]
    async fn test_find_filters_and_pages() {
        let store = MemoryUserStore::new();
        store
            .create(&new_user("Ada Lovelace", "ada@example.com", UserRole::Admin))
            .await
            .unwrap();
        let grace = store
            .create(&new_user("Grace Hopper", "grace@navy.mil", UserRole::User))
            .await
            .unwrap();
        store
            .create(&new_user("Alan Turing", "alan@example.com", UserRole::User))
            .await
            .unwrap();
        store
            .set_status_and_revoke(grace.id, UserStatus::Inactive)
            .await
            .unwrap();

        let page = PageRequest::new(1, 10);

        let admins = UserFilter {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        assert_eq!(store.find(&admins, &page).await.unwrap().total_items, 1);

        let inactive = UserFilter {
            status: Some(UserStatus::Inactive),
            ..Default::default()
        };
        let result = store.find(&inactive, &page).await.unwrap();
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].id, grace.id);

        let search = UserFilter {
            search: Some("EXAMPLE".to_string()),
            ..Default::default()
        };
        assert_eq!(store.find(&search, &page).await.unwrap().total_items, 2);

        let small = PageRequest::new(2, 2);
        let all = store.find(&UserFilter::default(), &small).await.unwrap();
        assert_eq!(all.total_items, 3);
        assert_eq!(all.total_pages, 2);
        assert_eq!(all.items.len(), 1);
    }
}
