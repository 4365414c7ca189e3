//! Session event delivery.

pub mod bus;

pub use bus::NotificationBus;
