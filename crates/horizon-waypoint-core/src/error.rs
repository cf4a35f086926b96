//! Error types for Horizon Waypoint core primitives.

use thiserror::Error;

use crate::animator::AnimationId;

/// Errors raised by the core primitives.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The animation has already finished or was never scheduled.
    #[error("unknown or finished animation {0:?}")]
    UnknownAnimation(AnimationId),

    /// The animation exists but is not percent-driven.
    #[error("animation {0:?} is not interactive")]
    NotInteractive(AnimationId),
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
