//! Configuration types.
//!
//! All types implement [`Default`] for compile-time fallback values.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default sliding-window session timeout.
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 300;

/// Unified configuration after all layers are merged.
///
/// # Example
///
/// ```
/// use warden_auth::config::WardenConfig;
///
/// let config = WardenConfig::from_toml("[session]\ntimeout_secs = 900\n")?;
/// assert_eq!(config.session.timeout_secs, 900);
/// # Ok::<(), toml::de::Error>(())
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WardenConfig {
    /// Session settings.
    pub session: SessionConfig,
}

impl WardenConfig {
    /// Deserializes from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid TOML or has the wrong shape.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Serializes to a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Overrides every value the layer sets.
    pub fn apply(&mut self, layer: &ConfigLayer) {
        self.session.apply(&layer.session);
    }
}

/// One configuration source before merging.
///
/// Every field is optional so a file can restate a default value and still
/// override an earlier layer.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigLayer {
    /// `[session]` table.
    pub session: SessionLayer,
}

impl ConfigLayer {
    /// Deserializes from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid TOML or has the wrong shape.
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }
}

/// Session values set by one layer.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionLayer {
    /// Sliding-window timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// Session settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Sliding-window timeout in seconds.
    pub timeout_secs: u64,
}

impl SessionConfig {
    /// Timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn apply(&mut self, layer: &SessionLayer) {
        if let Some(timeout_secs) = layer.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_SESSION_TIMEOUT_SECS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = WardenConfig::default();
        assert_eq!(config.session.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn empty_toml_is_default() {
        let config = WardenConfig::from_toml("").expect("empty toml parses");
        assert_eq!(config, WardenConfig::default());
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = WardenConfig::default();
        config.session.timeout_secs = 45;
        let text = config.to_toml().expect("serialize");
        assert!(text.contains("timeout_secs = 45"), "got: {text}");
        assert_eq!(WardenConfig::from_toml(&text).expect("parse"), config);
    }

    #[test]
    fn empty_layer_keeps_base() {
        let mut base = WardenConfig::default();
        base.session.timeout_secs = 60;
        base.apply(&ConfigLayer::from_toml("").expect("empty toml parses"));
        assert_eq!(base.session.timeout_secs, 60);

        base.apply(&ConfigLayer::from_toml("[session]\ntimeout_secs = 10\n").expect("parse"));
        assert_eq!(base.session.timeout_secs, 10);
    }

    #[test]
    fn layer_restating_default_still_overrides() {
        let mut base = WardenConfig::default();
        base.session.timeout_secs = 600;
        let layer = ConfigLayer::from_toml("[session]\ntimeout_secs = 300\n").expect("parse");
        assert_eq!(layer.session.timeout_secs, Some(DEFAULT_SESSION_TIMEOUT_SECS));

        base.apply(&layer);
        assert_eq!(base.session.timeout_secs, DEFAULT_SESSION_TIMEOUT_SECS);
    }

    #[test]
    fn wrong_type_is_rejected() {
        assert!(WardenConfig::from_toml("[session]\ntimeout_secs = \"soon\"\n").is_err());
    }
}
