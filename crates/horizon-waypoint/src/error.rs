//! Error types for the navigation engine.
//!
//! Most navigation operations cannot fail from the caller's point of view:
//! unknown screens fall back to a placeholder and out-of-range levels are
//! no-ops. The errors here surface from setup (registration, configuration)
//! and from the internal resolution step, where they are logged and recovered.

use thiserror::Error;

pub use horizon_waypoint_core::CoreError;

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("failed to parse navigator config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config file could not be read.
    #[error("failed to read navigator config: {0}")]
    Io(#[from] std::io::Error),

    /// A field holds a value outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Registration errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A screen with this identifier is already registered.
    #[error("screen `{0}` is already registered")]
    DuplicateScreen(String),

    /// A transition style with this name is already registered.
    #[error("transition style `{0}` is already registered")]
    DuplicateTransition(String),
}

/// Screen resolution errors. Recovered by the navigator, never propagated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No factory is registered for the identifier.
    #[error("no screen registered as `{0}`")]
    UnknownScreen(String),

    /// The identifier resolved, but not to a container screen.
    #[error("`{0}` is not a container screen")]
    NotAContainer(String),
}

/// The crate-level error type.
#[derive(Error, Debug)]
pub enum NavigationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// A specialized Result type for navigation setup.
pub type Result<T> = std::result::Result<T, NavigationError>;
