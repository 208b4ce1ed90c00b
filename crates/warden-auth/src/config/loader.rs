//! Configuration loader with layered merging.
//!
//! # Load Order
//!
//! 1. Default values (compile-time)
//! 2. Global config (`~/.warden/config.toml`)
//! 3. Explicit files added with [`ConfigLoader::with_file`], in order
//! 4. Environment variables (`WARDEN_*`)
//!
//! Each layer overrides the previous.

use super::{default_config_path, ConfigError, ConfigLayer, WardenConfig};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding `session.timeout_secs`.
pub const ENV_SESSION_TIMEOUT: &str = "WARDEN_SESSION_TIMEOUT";

/// Configuration loader with builder pattern.
///
/// # Example
///
/// ```no_run
/// use warden_auth::config::ConfigLoader;
///
/// let config = ConfigLoader::new()
///     .with_file("/etc/warden/config.toml")
///     .load()?;
/// println!("session timeout: {:?}", config.session.timeout());
/// # Ok::<(), warden_auth::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    /// Global config file path (defaults to ~/.warden/config.toml).
    global_config_path: Option<PathBuf>,

    /// Additional files layered over the global config.
    files: Vec<PathBuf>,

    skip_env: bool,
    skip_global: bool,
}

impl ConfigLoader {
    /// Creates a new loader with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom global config path.
    #[must_use]
    pub fn with_global_config(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_config_path = Some(path.into());
        self
    }

    /// Adds a config file layered over everything added before it.
    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push(path.into());
        self
    }

    /// Skips environment variable loading.
    #[must_use]
    pub fn skip_env_vars(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Skips global config loading.
    #[must_use]
    pub fn skip_global_config(mut self) -> Self {
        self.skip_global = true;
        self
    }

    /// Loads and merges configuration from all sources.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a config file exists but cannot be read or
    /// parsed, or if an environment override is malformed. Missing files
    /// are skipped.
    pub fn load(&self) -> Result<WardenConfig, ConfigError> {
        let mut config = WardenConfig::default();

        if !self.skip_global {
            let global_path = self
                .global_config_path
                .clone()
                .unwrap_or_else(default_config_path);

            if let Some(layer) = load_file(&global_path)? {
                debug!(path = %global_path.display(), "Loaded global config");
                config.apply(&layer);
            }
        }

        for path in &self.files {
            if let Some(layer) = load_file(path)? {
                debug!(path = %path.display(), "Loaded config file");
                config.apply(&layer);
            }
        }

        if !self.skip_env {
            apply_env(&mut config, |name| std::env::var(name).ok())?;
        }

        Ok(config)
    }
}

/// Loads a config file, returning `None` if it doesn't exist.
fn load_file(path: &Path) -> Result<Option<ConfigLayer>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
    let layer = ConfigLayer::from_toml(&content).map_err(|e| ConfigError::parse_toml(path, e))?;

    Ok(Some(layer))
}

fn apply_env<F>(config: &mut WardenConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup(ENV_SESSION_TIMEOUT) {
        config.session.timeout_secs = val.trim().parse().map_err(|_| {
            ConfigError::invalid_env_var(ENV_SESSION_TIMEOUT, "expected whole seconds")
        })?;
        debug!(timeout_secs = config.session.timeout_secs, "Applied env override");
    }
    Ok(())
}
