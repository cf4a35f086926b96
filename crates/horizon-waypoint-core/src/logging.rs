//! Logging facilities for Horizon Waypoint.
//!
//! Horizon Waypoint uses the `tracing` crate for instrumentation. Nothing is
//! printed unless the application installs a subscriber:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_waypoint::navigator=debug")
//!     .init();
//! ```
//!
//! Every event is emitted under one of the [`targets`], so a subsystem can be
//! enabled on its own.

/// Span names used throughout Horizon Waypoint.
pub mod span_names {
    /// A show operation (`open`, deep-link hop).
    pub const SHOW: &str = "horizon_waypoint::show";
    /// A dismiss operation (`close`, `back_to`, `back_to_root`).
    pub const DISMISS: &str = "horizon_waypoint::dismiss";
    /// A `goto` search.
    pub const GOTO: &str = "horizon_waypoint::goto";
    /// A deep-link chain.
    pub const DEEP_LINK: &str = "horizon_waypoint::deep_link";
}

/// Target names for log filtering.
pub mod targets {
    /// Core primitives.
    pub const CORE: &str = "horizon_waypoint_core";
    /// Animator scheduling and completion.
    pub const ANIMATOR: &str = "horizon_waypoint_core::animator";
    /// Signal emission.
    pub const SIGNAL: &str = "horizon_waypoint_core::signal";
    /// Navigator state machine.
    pub const NAVIGATOR: &str = "horizon_waypoint::navigator";
    /// Navigation stack bookkeeping.
    pub const STACK: &str = "horizon_waypoint::stack";
    /// Transition state machine and gestures.
    pub const TRANSITION: &str = "horizon_waypoint::transition";
    /// Screen and transition registries.
    pub const REGISTRY: &str = "horizon_waypoint::registry";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// Used to time navigation operations end to end.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_waypoint::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[macro_export]
macro_rules! waypoint_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_waypoint", $($arg)*)
    };
}

#[macro_export]
macro_rules! waypoint_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_waypoint", $($arg)*)
    };
}

#[macro_export]
macro_rules! waypoint_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "horizon_waypoint", $($arg)*)
    };
}

#[macro_export]
macro_rules! waypoint_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_waypoint", $($arg)*)
    };
}

#[macro_export]
macro_rules! waypoint_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_waypoint", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new(span_names::SHOW);
    }

    #[test]
    fn test_macros_with_subscriber() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            waypoint_debug!(count = 3, "stack compacted");
            waypoint_warn!("placeholder shown");
        });
    }
}
