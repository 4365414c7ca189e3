//! Task listing and bulk updates.

pub mod service;

pub use service::TaskService;
