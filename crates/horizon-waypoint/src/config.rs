//! Navigator configuration.
//!
//! [`NavigatorConfig`] collects the tunables of the engine: default animation
//! length, interactive-gesture thresholds, backdrop dimming and presentation
//! defaults. It deserializes from TOML with every field optional.
//!
//! # Example
//!
//! ```
//! use horizon_waypoint::NavigatorConfig;
//!
//! let config = NavigatorConfig::from_toml_str(r#"
//!     animation_duration_ms = 250
//!     default_transition = "fade"
//! "#).unwrap();
//!
//! assert_eq!(config.animation_duration().as_millis(), 250);
//! assert_eq!(config.interactive_threshold, 0.5);
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The platform's standard modal presentation duration.
pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 350;

/// Tunables of the navigation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Default transition length in milliseconds.
    pub animation_duration_ms: u64,
    /// Fraction of the relevant dimension an interactive pan must exceed.
    pub interactive_threshold: f32,
    /// Seconds of velocity added to the translation when deciding completion.
    pub velocity_projection: f32,
    /// Completion speed of a cancelled interactive transition.
    pub cancel_speed: f32,
    /// Lower bound on the finish speed of a completed interactive transition.
    pub min_finish_speed: f32,
    /// Distance from an edge within which an edge-pan may begin.
    pub edge_zone: f32,
    /// Dim level of overlay and popover backdrops.
    pub backdrop_alpha: f32,
    /// Wrap plain `present` targets in a stack container.
    pub auto_wrap_presented: bool,
    /// Transition style used when a request names none.
    pub default_transition: Option<String>,
    /// Trace the screen tree after every committed operation.
    pub log_hierarchy: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            interactive_threshold: 0.5,
            velocity_projection: 0.1,
            cancel_speed: 0.35,
            min_finish_speed: 0.25,
            edge_zone: 44.0,
            backdrop_alpha: 0.4,
            auto_wrap_presented: true,
            default_transition: None,
            log_hierarchy: false,
        }
    }
}

impl NavigatorConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> String {
        // Every field is a plain scalar or string, so serialization cannot fail.
        toml::to_string_pretty(self).unwrap_or_default()
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.interactive_threshold > 0.0 && self.interactive_threshold <= 1.0) {
            return Err(invalid("interactive_threshold", "must be in (0, 1]"));
        }
        if self.cancel_speed <= 0.0 {
            return Err(invalid("cancel_speed", "must be positive"));
        }
        if self.min_finish_speed <= 0.0 {
            return Err(invalid("min_finish_speed", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.backdrop_alpha) {
            return Err(invalid("backdrop_alpha", "must be in [0, 1]"));
        }
        if self.edge_zone < 0.0 {
            return Err(invalid("edge_zone", "must not be negative"));
        }
        if self.velocity_projection < 0.0 {
            return Err(invalid("velocity_projection", "must not be negative"));
        }
        Ok(())
    }

    /// Default transition length.
    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
