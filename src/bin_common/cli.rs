//! CLI utilities for binaries
//!
//! Handles configuration path lookup and command line arguments
//! for all binary executables.

use std::path::PathBuf;

/// Environment variable overriding the configuration path
pub const CONFIG_PATH_ENV: &str = "WS_CONFIG_PATH";

/// Shared demo configuration used when `WS_CONFIG_PATH` is unset
pub const DEFAULT_CONFIG_PATH: &str = "config/servertime.yaml";

/// Configuration path from `WS_CONFIG_PATH`, or the default
///
/// # Examples
/// ```
/// use servertime_ws::bin_common::config_path_from_env;
///
/// let path = config_path_from_env();
/// ```
pub fn config_path_from_env() -> PathBuf {
    config_path_from(|key| std::env::var(key).ok())
}

fn config_path_from<F>(lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    lookup(CONFIG_PATH_ENV)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

/// Parse command line arguments for a binary
///
/// Returns a vector of arguments (excluding the program name)
pub fn parse_args() -> Vec<String> {
    std::env::args().skip(1).collect()
}
