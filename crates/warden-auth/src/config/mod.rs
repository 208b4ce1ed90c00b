//! Configuration management with layered merging.
//!
//! ```text
//! Priority (highest to lowest):
//!
//! ┌───────────────────────────────────────────┐
//! │  1. Environment Variables (WARDEN_*)      │
//! ├───────────────────────────────────────────┤
//! │  2. Explicit files (ConfigLoader)         │
//! ├───────────────────────────────────────────┤
//! │  3. Global Config (~/.warden/config.toml) │
//! ├───────────────────────────────────────────┤
//! │  4. Default Values (compile-time)         │
//! └───────────────────────────────────────────┘
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Config Field | Type |
//! |----------|--------------|------|
//! | `WARDEN_SESSION_TIMEOUT` | `session.timeout_secs` | u64 seconds |
//!
//! # Example Configuration
//!
//! ```toml
//! [session]
//! timeout_secs = 300
//! ```

mod error;
mod loader;
mod types;

pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_SESSION_TIMEOUT};
pub use types::{
    ConfigLayer, SessionConfig, SessionLayer, WardenConfig, DEFAULT_SESSION_TIMEOUT_SECS,
};

/// Global config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Default global config directory.
pub fn default_config_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".warden")
}

/// Default global config file path.
pub fn default_config_path() -> std::path::PathBuf {
    default_config_dir().join(CONFIG_FILE)
}
