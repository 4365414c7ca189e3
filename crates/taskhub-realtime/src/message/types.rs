//! Inbound and outbound frame definitions.
//!
//! Every frame is a JSON text message `{"event": <name>, "data": <payload>}`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use taskhub_entity::user::UserStatus;
use taskhub_service::LogoutReason;

/// Envelope as it arrives, before the event name is interpreted.
#[derive(Debug, Deserialize)]
struct RawFrame {
    event: String,
    #[serde(default)]
    data: Value,
}

/// `authenticate` payload: a bare user id, or an object with an optional
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AnnouncePayload {
    /// `"data": "<uuid>"`
    Bare(Uuid),
    /// `"data": {"userId": "<uuid>", "token": "<jwt>"}`
    Detailed {
        /// The identity being announced.
        #[serde(rename = "userId")]
        user_id: Uuid,
        /// A credential proving it.
        #[serde(default)]
        token: Option<String>,
    },
}

impl AnnouncePayload {
    /// The announced identity.
    pub fn user_id(&self) -> Uuid {
        match self {
            Self::Bare(id) => *id,
            Self::Detailed { user_id, .. } => *user_id,
        }
    }

    /// The accompanying token, if any.
    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Bare(_) => None,
            Self::Detailed { token, .. } => token.as_deref(),
        }
    }
}

/// Client → server events.
#[derive(Debug, Clone, PartialEq)]
pub enum InboundMessage {
    /// Bind this connection to an identity.
    Authenticate(AnnouncePayload),
    /// Debug echo.
    Test(Value),
}

impl InboundMessage {
    /// Parse a text frame. The error string is sent back to the client.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let frame: RawFrame =
            serde_json::from_str(raw).map_err(|e| format!("Failed to parse message: {e}"))?;

        match frame.event.as_str() {
            "authenticate" => serde_json::from_value(frame.data)
                .map(Self::Authenticate)
                .map_err(|_| {
                    "authenticate expects a user id or {\"userId\", \"token\"}".to_string()
                }),
            "test" => Ok(Self::Test(frame.data)),
            other => Err(format!("Unknown event: '{other}'")),
        }
    }
}

/// Server → client events.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum OutboundMessage {
    /// Reply to `authenticate`.
    Authenticated {
        /// Whether the connection is now bound.
        success: bool,
        /// Human-readable detail.
        message: String,
    },
    /// The client must drop its credential.
    ForceLogout(ForceLogoutPayload),
    /// Reply to `test`.
    TestResponse {
        /// The payload that was sent.
        received: Value,
        /// Fixed acknowledgement text.
        message: String,
    },
    /// The inbound frame was rejected.
    Error {
        /// Machine-readable code.
        code: String,
        /// Human-readable detail.
        message: String,
    },
}

/// The two shapes a `force-logout` takes on the wire.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ForceLogoutPayload {
    /// Sent to the connections of the affected identity.
    Targeted(TargetedLogout),
    /// Sent to every connection when an identity is deactivated.
    StatusChange(StatusChangeNotice),
}

/// Targeted `force-logout` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetedLogout {
    /// The identity being logged out.
    pub identity_id: Uuid,
    /// Why.
    pub reason: LogoutReason,
    /// Text for the user.
    pub message: String,
    /// When the server sent it.
    pub server_timestamp: DateTime<Utc>,
}

/// Broadcast `force-logout` body. Clients compare `identityId` with their
/// own and ignore the rest.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeNotice {
    /// Always `status-change`.
    #[serde(rename = "type")]
    pub kind: LogoutReason,
    /// The identity whose status changed.
    pub identity_id: Uuid,
    /// The new status.
    pub status: UserStatus,
    /// Text for the user.
    pub message: String,
}

impl OutboundMessage {
    /// Targeted logout for `identity_id`.
    pub fn force_logout(identity_id: Uuid, reason: LogoutReason) -> Self {
        Self::ForceLogout(ForceLogoutPayload::Targeted(TargetedLogout {
            identity_id,
            reason,
            message: reason.message().to_string(),
            server_timestamp: Utc::now(),
        }))
    }

    /// Broadcast notice that `identity_id` now has `status`.
    pub fn status_change(identity_id: Uuid, status: UserStatus) -> Self {
        Self::ForceLogout(ForceLogoutPayload::StatusChange(StatusChangeNotice {
            kind: LogoutReason::StatusChange,
            identity_id,
            status,
            message: format!("Account status changed to {status}"),
        }))
    }

    /// Protocol error reply.
    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.to_string(),
            message: message.into(),
        }
    }

    /// Serialize to a text frame.
    pub fn to_frame(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_bare_announce() {
        let id = Uuid::new_v4();
        let raw = json!({"event": "authenticate", "data": id.to_string()}).to_string();
        let msg = InboundMessage::parse(&raw).unwrap();
        assert_eq!(msg, InboundMessage::Authenticate(AnnouncePayload::Bare(id)));
    }

    #[test]
    fn test_parse_detailed_announce() {
        let id = Uuid::new_v4();
        let raw = json!({"event": "authenticate", "data": {"userId": id, "token": "abc"}})
            .to_string();
        let InboundMessage::Authenticate(payload) = InboundMessage::parse(&raw).unwrap() else {
            panic!("expected authenticate");
        };
        assert_eq!(payload.user_id(), id);
        assert_eq!(payload.token(), Some("abc"));
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert!(InboundMessage::parse("not json").is_err());
        assert!(InboundMessage::parse(r#"{"event": "authenticate", "data": 42}"#).is_err());
        assert!(InboundMessage::parse(r#"{"event": "subscribe", "data": {}}"#).is_err());
    }

    #[test]
    fn test_test_event_without_data() {
        let msg = InboundMessage::parse(r#"{"event": "test"}"#).unwrap();
        assert_eq!(msg, InboundMessage::Test(Value::Null));
    }

    #[test]
    fn test_targeted_force_logout_shape() {
        let id = Uuid::new_v4();
        let frame = OutboundMessage::force_logout(id, LogoutReason::StatusChange)
            .to_frame()
            .unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["event"], "force-logout");
        assert_eq!(value["data"]["identityId"], id.to_string());
        assert_eq!(value["data"]["reason"], "status-change");
        assert!(value["data"]["message"].is_string());
        assert!(value["data"]["serverTimestamp"].is_string());
    }

    #[test]
    fn test_broadcast_force_logout_shape() {
        let id = Uuid::new_v4();
        let frame = OutboundMessage::status_change(id, UserStatus::Inactive)
            .to_frame()
            .unwrap();
        let value: Value = serde_json::from_str(&frame).unwrap();

        assert_eq!(value["event"], "force-logout");
        assert_eq!(value["data"]["type"], "status-change");
        assert_eq!(value["data"]["identityId"], id.to_string());
        assert_eq!(value["data"]["status"], "inactive");
    }

    #[test]
    fn test_authenticated_reply_shape() {
        let frame = OutboundMessage::Authenticated {
            success: true,
            message: "ok".to_string(),
        }
        .to_frame()
        .unwrap();
        assert_eq!(
            serde_json::from_str::<Value>(&frame).unwrap(),
            json!({"event": "authenticated", "data": {"success": true, "message": "ok"}})
        );
    }
}
