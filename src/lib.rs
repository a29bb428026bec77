//! Server Time WebSocket demo - Main Library
//!
//! Ties the `socket-client` library to a runnable demo: a client that asks
//! a WebSocket endpoint for its time, and the server that answers.
//!
//! ## Architecture
//!
//! - **config**: YAML + environment configuration
//! - **logging**: tracing subscriber setup
//! - **server**: the time server answering `{"testsend": ...}` requests
//! - **bin_common**: Common utilities for binary executables (CLI, runners, teardown)
//! - **socket_client**: WebSocket client library (re-exported from workspace)
//!
//! ## Usage in Binaries
//!
//! ```rust,ignore
//! use servertime_ws::bin_common::config_path_from_env;
//! use servertime_ws::config::AppConfig;
//! ```

// Re-export workspace libraries for convenience
pub use socket_client;

pub mod config;
pub mod logging;
pub mod server;

// Binary common utilities
pub mod bin_common {
    //! Common utilities for binary executables
    //!
    //! Provides shared functionality for the presentation layer (binaries).

    pub mod cli;
    pub mod runner;
    pub mod shutdown;

    pub use cli::{config_path_from_env, parse_args, CONFIG_PATH_ENV, DEFAULT_CONFIG_PATH};
    pub use runner::{BinaryRunner, RunConfig};
    pub use shutdown::ShutdownManager;
}
