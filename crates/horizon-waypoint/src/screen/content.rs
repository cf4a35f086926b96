//! Screen content and its navigation hooks.

use std::any::Any;

use horizon_waypoint_core::Size;

use crate::page::{PageData, PageRequest};

/// The application-side half of a screen.
///
/// Every hook has a no-op default, so content implements only what it needs.
/// Hooks are invoked on the UI thread while the content is mutably borrowed;
/// calling back into navigation from a hook is allowed, but a hook that
/// triggers a notification of its own screen is skipped with a warning.
pub trait ScreenContent: Any {
    /// Called once right after the screen is instantiated for `request`.
    fn did_receive_request(&mut self, _request: &PageRequest) {}

    /// Called with the request's data before the screen becomes visible.
    fn before_show(&mut self, _data: Option<&PageData>) {}

    /// Called on the screen being revealed, before a dismissal removes what
    /// covered it.
    fn before_back(&mut self, _data: Option<&PageData>) {}

    /// Called on the revealed screen after the dismissal finished.
    fn after_back(&mut self, _data: Option<&PageData>) {}

    /// Whether an interactive dismiss gesture may start right now.
    fn allows_interactive_dismiss(&self) -> bool {
        true
    }

    /// An interactive dismiss crossed its threshold and is about to finish.
    fn will_finish_gesture_dismiss(&mut self) {}

    /// An interactive dismiss finished.
    fn did_finish_gesture_dismiss(&mut self) {}

    /// Size wanted when shown as a popover or overlay.
    fn preferred_size(&self) -> Option<Size> {
        None
    }
}

/// Content of containers and of screens built without content.
#[derive(Debug, Default)]
pub struct Blank;

impl ScreenContent for Blank {}

/// Placeholder shown when a requested screen cannot be resolved.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct NotFound {
    /// The identifier that failed to resolve.
    pub requested: String,
}

impl ScreenContent for NotFound {
    fn did_receive_request(&mut self, request: &PageRequest) {
        self.requested = request.target().name().to_string();
    }
}
