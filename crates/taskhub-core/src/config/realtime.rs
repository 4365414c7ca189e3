//! Real-time WebSocket engine configuration.

use serde::{Deserialize, Serialize};

/// Real-time (WebSocket) engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Outbound buffer per connection; pushes beyond it are dropped.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
    /// Require a valid credential in the `authenticate` message and check it
    /// belongs to the announced identity.
    #[serde(default)]
    pub require_announce_token: bool,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
            require_announce_token: false,
        }
    }
}

fn default_channel_buffer() -> usize {
    64
}
