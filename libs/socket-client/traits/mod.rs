//! # Socket Client Traits
//!
//! Core traits and types shared by the client and its callers:
//!
//! - **SocketHandler**: lifecycle callbacks (open, message, close, error)
//! - **LogSink**: where diagnostic lines end up
//! - **WsMessage / OutboundMessage / CloseEvent**: payloads exchanged with the handler
//! - **SocketError / TransportError**: library errors and transport diagnostics
//!
//! ## Example
//!
//! ```rust,ignore
//! use socket_client::*;
//!
//! struct Printer;
//!
//! impl SocketHandler for Printer {
//!     fn on_open(&mut self, _endpoint: &str, outbox: &mut Outbox) -> Result<()> {
//!         outbox.send_json(&OutboundMessage::server_time_request())
//!     }
//!
//!     fn on_message(&mut self, message: &WsMessage) {
//!         println!("{:?}", message);
//!     }
//! }
//! ```

pub mod error;
pub mod handler;
pub mod message;
pub mod sink;

// Re-export commonly used types
pub use error::{Result, SocketError, TransportError};
pub use handler::{Outbox, ServerTimeHandler, SocketHandler};
pub use message::{CloseEvent, OutboundMessage, WsMessage};
pub use sink::{LogSink, MemorySink, TracingSink};
