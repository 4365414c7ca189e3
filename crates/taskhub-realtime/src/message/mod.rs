//! Realtime frame formats.

pub mod types;

pub use types::{AnnouncePayload, ForceLogoutPayload, InboundMessage, OutboundMessage};
