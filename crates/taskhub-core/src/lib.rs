//! # taskhub-core
//!
//! Core crate for TaskHub. Contains configuration schemas, pagination
//! types, the API error body, and the unified error system.
//!
//! This crate has **no** internal dependencies on other TaskHub crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
