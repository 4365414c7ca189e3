//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use taskhub_auth::{PasswordHasher, PasswordValidator, TokenCodec, TokenValidator};
use taskhub_core::config::AppConfig;
use taskhub_database::{DatabasePool, Stores};
use taskhub_realtime::RealtimeEngine;
use taskhub_service::{AdminUserService, RevocationCoordinator, TaskService, UserService};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Process start, for uptime reporting
    pub started_at: Instant,

    // ── Infrastructure ───────────────────────────────────────
    /// PostgreSQL pool, absent with the in-memory backend
    pub db_pool: Option<DatabasePool>,

    // ── Auth ─────────────────────────────────────────────────
    /// The protect gate for bearer tokens
    pub token_validator: Arc<TokenValidator>,

    // ── Realtime ─────────────────────────────────────────────
    /// WebSocket realtime engine
    pub realtime: Arc<RealtimeEngine>,

    // ── Services ─────────────────────────────────────────────
    /// Registration and login
    pub user_service: Arc<UserService>,
    /// Admin user listing
    pub admin_user_service: Arc<AdminUserService>,
    /// Status changes and session revocation
    pub revocation: Arc<RevocationCoordinator>,
    /// Task listing and bulk updates
    pub task_service: Arc<TaskService>,
}

impl AppState {
    /// Wire services, auth and the realtime engine over `stores`.
    pub fn build(config: AppConfig, stores: Stores) -> Self {
        let codec = Arc::new(TokenCodec::new(&config.auth));
        let token_validator = Arc::new(TokenValidator::new(codec.clone(), stores.users.clone()));

        let realtime = Arc::new(RealtimeEngine::new(
            config.realtime.clone(),
            token_validator.clone(),
        ));

        let user_service = Arc::new(UserService::new(
            stores.users.clone(),
            codec,
            Arc::new(PasswordHasher::new()),
            Arc::new(PasswordValidator::new(&config.auth)),
        ));
        let admin_user_service = Arc::new(AdminUserService::new(stores.users.clone()));
        let revocation = Arc::new(RevocationCoordinator::new(
            stores.users,
            realtime.bus.clone(),
        ));
        let task_service = Arc::new(TaskService::new(stores.tasks));

        Self {
            config: Arc::new(config),
            started_at: Instant::now(),
            db_pool: stores.pool,
            token_validator,
            realtime,
            user_service,
            admin_user_service,
            revocation,
            task_service,
        }
    }
}
