//! Account services: sign-up and login, admin listing, and status changes.

pub mod admin;
pub mod revocation;
pub mod service;

pub use admin::AdminUserService;
pub use revocation::{RevocationCoordinator, StatusChangeOutcome};
pub use service::{AuthSession, UserService};
