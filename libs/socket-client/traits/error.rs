use std::fmt;
use std::io;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Main error type for the socket client
#[derive(Error, Debug)]
pub enum SocketError {
    /// Outbound payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("Error: {0}")]
    Other(String),
}

/// Result type for socket client operations
pub type Result<T> = std::result::Result<T, SocketError>;

/// Transport-level error surfaced to `SocketHandler::on_error`
///
/// There is a single undifferentiated kind of transport error. Instead of
/// classifying it, the error carries every property that is available as an
/// ordered list of `(name, value)` pairs, and handlers dump them as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    properties: Vec<(String, String)>,
}

impl TransportError {
    /// Build an error from arbitrary properties, keeping their order
    pub fn from_properties<I, K, V>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Reported when the client is closed while the connection attempt is
    /// still in flight
    pub fn closed_before_open() -> Self {
        Self::from_properties([
            ("kind", "closed_before_open"),
            (
                "message",
                "WebSocket is closed before the connection is established",
            ),
        ])
    }

    /// All properties in insertion order
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Look up a single property by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn push(&mut self, name: &str, value: impl Into<String>) {
        self.properties.push((name.to_string(), value.into()));
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (name, value) in &self.properties {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", name, value)?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for TransportError {}

impl From<&tungstenite::Error> for TransportError {
    fn from(err: &tungstenite::Error) -> Self {
        use tungstenite::Error as WsError;

        let kind = match err {
            WsError::ConnectionClosed => "connection_closed",
            WsError::AlreadyClosed => "already_closed",
            WsError::Io(_) => "io",
            WsError::Capacity(_) => "capacity",
            WsError::Protocol(_) => "protocol",
            WsError::WriteBufferFull(_) => "write_buffer_full",
            WsError::Utf8 { .. } => "utf8",
            WsError::AttackAttempt { .. } => "attack_attempt",
            WsError::Url(_) => "url",
            WsError::Http(_) => "http",
            WsError::HttpFormat(_) => "http_format",
            WsError::Tls(_) => "tls",
            _ => "other",
        };

        let mut transport = Self::from_properties([("kind", kind)]);
        transport.push("message", err.to_string());

        match err {
            WsError::Io(io_err) => {
                transport.push("code", errno_name(io_err));
                if let Some(errno) = io_err.raw_os_error() {
                    transport.push("errno", errno.to_string());
                }
            }
            WsError::Http(response) => {
                transport.push("status", response.status().as_u16().to_string());
            }
            _ => {}
        }

        transport
    }
}

impl From<tungstenite::Error> for TransportError {
    fn from(err: tungstenite::Error) -> Self {
        Self::from(&err)
    }
}

/// Errno-style name for an I/O error, falling back to the kind's debug name
fn errno_name(err: &io::Error) -> String {
    let name = match err.kind() {
        io::ErrorKind::ConnectionRefused => "ECONNREFUSED",
        io::ErrorKind::ConnectionReset => "ECONNRESET",
        io::ErrorKind::ConnectionAborted => "ECONNABORTED",
        io::ErrorKind::NotConnected => "ENOTCONN",
        io::ErrorKind::AddrInUse => "EADDRINUSE",
        io::ErrorKind::AddrNotAvailable => "EADDRNOTAVAIL",
        io::ErrorKind::BrokenPipe => "EPIPE",
        io::ErrorKind::TimedOut => "ETIMEDOUT",
        io::ErrorKind::PermissionDenied => "EACCES",
        io::ErrorKind::NotFound => "ENOTFOUND",
        other => return format!("{:?}", other),
    };
    name.to_string()
}
