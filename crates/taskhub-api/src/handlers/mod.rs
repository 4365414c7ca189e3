//! Route handlers organized by domain.

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
pub mod ws;
