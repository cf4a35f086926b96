//! The transition style trait.

use std::time::Duration;

use horizon_waypoint_core::{Easing, Edges, FrameFn, Orientation};

use super::TransitionContext;

/// How a transition looks.
///
/// A style turns a [`TransitionContext`] into a per-frame closure. Modal
/// operations ask [`animate_presentation`](Self::animate_presentation),
/// stack operations ask [`animate_navigation`](Self::animate_navigation).
/// Both default to `None`, meaning "nothing to animate": the transition then
/// completes on the next tick. A style returns `None` as well when a surface
/// it needs is missing from the context.
///
/// Frames receive eased progress toward the end of the operation, so `1.0`
/// always means "shown" for a show and "gone" for a dismiss.
pub trait TransitionStyle {
    /// Registry name.
    fn name(&self) -> &str;

    /// Length of the animation. `None` uses the configured default.
    fn duration(&self) -> Option<Duration> {
        None
    }

    fn orientation(&self) -> Orientation {
        Orientation::Horizontal
    }

    /// Edges an interactive dismiss may start from. Empty disables gestures.
    fn interactive_edges(&self) -> Edges {
        Edges::NONE
    }

    fn easing(&self) -> Easing {
        Easing::EaseInOut
    }

    fn animate_presentation(&self, _context: &TransitionContext) -> Option<FrameFn> {
        None
    }

    fn animate_navigation(&self, _context: &TransitionContext) -> Option<FrameFn> {
        None
    }
}
