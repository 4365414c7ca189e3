//! # taskhub-entity
//!
//! Domain entity models for TaskHub. Every struct in this crate represents
//! a database table row or a domain value object. Database entities derive
//! `sqlx::FromRow`.

pub mod task;
pub mod user;
