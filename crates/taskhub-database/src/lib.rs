//! # taskhub-database
//!
//! Persistence for TaskHub. The [`UserStore`] and [`TaskStore`] traits are
//! the seam every service talks to; PostgreSQL repositories (sqlx) and
//! in-memory stores (dashmap) implement them. [`build_stores`] picks the
//! backend named in configuration.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

use std::sync::Arc;

use tracing::info;

use taskhub_core::config::{DatabaseConfig, StoreBackend};
use taskhub_core::result::AppResult;

pub use connection::DatabasePool;
pub use memory::{MemoryTaskStore, MemoryUserStore};
pub use repositories::{TaskRepository, UserRepository};
pub use store::{TaskStore, UserFilter, UserStore};

/// The store pair handed to the service layer.
#[derive(Debug, Clone)]
pub struct Stores {
    /// User persistence.
    pub users: Arc<dyn UserStore>,
    /// Task persistence.
    pub tasks: Arc<dyn TaskStore>,
    /// The PostgreSQL pool, when that backend is active.
    pub pool: Option<DatabasePool>,
}

/// Build the configured store backend, running migrations when asked.
pub async fn build_stores(config: &DatabaseConfig) -> AppResult<Stores> {
    match config.backend {
        StoreBackend::Postgres => {
            let db = DatabasePool::connect(config).await?;
            if config.run_migrations {
                migration::run_migrations(db.pool()).await?;
            }
            Ok(Stores {
                users: Arc::new(UserRepository::new(db.pool().clone())),
                tasks: Arc::new(TaskRepository::new(db.pool().clone())),
                pool: Some(db),
            })
        }
        StoreBackend::Memory => {
            info!("Using in-memory stores; data is lost on restart");
            Ok(Stores {
                users: Arc::new(MemoryUserStore::new()),
                tasks: Arc::new(MemoryTaskStore::new()),
                pool: None,
            })
        }
    }
}
