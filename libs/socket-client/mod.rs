//! # Socket Client
//!
//! A minimal WebSocket client that owns exactly one connection to a fixed
//! endpoint and reports its lifecycle through callbacks.
//!
//! ## Features
//!
//! - **Fire-and-forget connect**: the connection runs on its own tokio task
//! - **Lifecycle callbacks**: open, message, close and error via [`SocketHandler`]
//! - **Idempotent teardown**: [`SocketClient::close`] is safe before the socket opens
//! - **Pluggable log sinks**: tracing for binaries, in-memory capture for tests

pub mod traits;
pub mod core;

// Re-export all traits
pub use traits::*;

// Re-export core client functionality
pub use self::core::{
    client, config, connection_state,
    client::{CloseHandle, SocketClient},
    config::{ClientConfig, DEFAULT_ENDPOINT, DEFAULT_GREETING},
    connection_state::{AtomicConnectionState, ConnectionState},
};

/// Type alias for Result with SocketError
pub type Result<T> = std::result::Result<T, traits::SocketError>;
