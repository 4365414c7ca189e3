//! A single realtime connection.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::DeliveryError;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// Sending side of one client connection.
///
/// Frames are pre-serialized JSON text; the transport task owns the
/// receiver and writes them to the socket.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID.
    pub id: ConnectionId,
    /// When the connection was opened.
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Wrap an outbound sender in a new handle.
    pub fn new(sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
            sender,
            alive: AtomicBool::new(true),
        }
    }

    /// Queue a frame without waiting.
    pub fn send(&self, frame: String) -> Result<(), DeliveryError> {
        if !self.is_alive() {
            return Err(DeliveryError::Closed(self.id));
        }
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => Err(DeliveryError::BufferFull(self.id)),
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                Err(DeliveryError::Closed(self.id))
            }
        }
    }

    /// Whether frames can still be queued.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Stop accepting frames.
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_buffer_and_closed_receiver() {
        let (tx, rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(tx);

        assert!(handle.send("one".to_string()).is_ok());
        assert_eq!(
            handle.send("two".to_string()),
            Err(DeliveryError::BufferFull(handle.id))
        );
        assert!(handle.is_alive());

        drop(rx);
        assert_eq!(
            handle.send("three".to_string()),
            Err(DeliveryError::Closed(handle.id))
        );
        assert!(!handle.is_alive());
    }
}
