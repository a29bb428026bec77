//! # Client core
//!
//! Connection task, configuration and connection state.
//!
//! ## Example
//!
//! ```rust,ignore
//! use socket_client::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut client = SocketClient::connect(
//!         ClientConfig::default(),
//!         ServerTimeHandler::new(TracingSink),
//!     );
//!
//!     // Close from a teardown hook
//!     let handle = client.close_handle();
//!     tokio::spawn(async move {
//!         let _ = tokio::signal::ctrl_c().await;
//!         handle.close();
//!     });
//!
//!     client.wait().await
//! }
//! ```

pub mod client;
pub mod config;
pub mod connection_state;

// Re-export main types
pub use client::{CloseHandle, SocketClient};
pub use config::ClientConfig;
pub use connection_state::{AtomicConnectionState, ConnectionState};

// Re-export traits for convenience
pub use crate::traits::*;
