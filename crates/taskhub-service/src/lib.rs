//! # taskhub-service
//!
//! Business logic service layer for TaskHub. Services talk to persistence
//! only through the store traits and to the realtime layer only through
//! [`SessionNotifier`], so both can be swapped in tests.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod notifier;
pub mod task;
pub mod user;

pub use context::RequestContext;
pub use notifier::{DeliveryReport, LogoutReason, SessionNotifier};
pub use task::TaskService;
pub use user::{AdminUserService, AuthSession, RevocationCoordinator, StatusChangeOutcome, UserService};
