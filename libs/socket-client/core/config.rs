use serde::{Deserialize, Serialize};

/// Address the demo client connects to
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080/ws_server";

/// `testsend` value sent once the connection opens
pub const DEFAULT_GREETING: &str = "get server time";

/// Configuration for a SocketClient
///
/// The endpoint is fixed for the lifetime of the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket URL (ws:// or wss://)
    pub endpoint: String,

    /// Text of the `testsend` field sent on open
    pub greeting: String,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Get a reference to the endpoint
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether the endpoint uses a WebSocket scheme
    pub fn has_ws_scheme(&self) -> bool {
        self.endpoint.starts_with("ws://") || self.endpoint.starts_with("wss://")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}
