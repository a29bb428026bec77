use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Inbound WebSocket payload
///
/// Payloads are opaque: the client never parses them, it only hands them to
/// the handler in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WsMessage {
    Text(String),
    Binary(Vec<u8>),
}

impl WsMessage {
    /// Get the message as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            WsMessage::Text(s) => Some(s),
            WsMessage::Binary(_) => None,
        }
    }

    /// Get the message as binary, if it is binary
    pub fn as_binary(&self) -> Option<&[u8]> {
        match self {
            WsMessage::Text(_) => None,
            WsMessage::Binary(b) => Some(b),
        }
    }

    /// Check if message is text
    pub fn is_text(&self) -> bool {
        matches!(self, WsMessage::Text(_))
    }

    /// Check if message is binary
    pub fn is_binary(&self) -> bool {
        matches!(self, WsMessage::Binary(_))
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        match self {
            WsMessage::Text(s) => s.len(),
            WsMessage::Binary(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Request sent once when the connection opens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub testsend: String,
}

impl OutboundMessage {
    pub fn new(testsend: impl Into<String>) -> Self {
        Self {
            testsend: testsend.into(),
        }
    }

    /// `{"testsend": "get server time"}`
    pub fn server_time_request() -> Self {
        Self::new(crate::core::config::DEFAULT_GREETING)
    }

    /// Encode as JSON text
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Close notification passed to `SocketHandler::on_close`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseEvent {
    pub code: u16,
    pub reason: String,
}

impl CloseEvent {
    pub const NORMAL: u16 = 1000;
    /// Close frame arrived without a status code
    pub const NO_STATUS: u16 = 1005;
    /// Connection ended without a close frame
    pub const ABNORMAL: u16 = 1006;

    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn abnormal() -> Self {
        Self::new(Self::ABNORMAL, "")
    }

    pub fn no_status() -> Self {
        Self::new(Self::NO_STATUS, "")
    }

    pub fn is_normal(&self) -> bool {
        self.code == Self::NORMAL
    }
}
