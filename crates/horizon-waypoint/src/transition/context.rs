//! What a transition animates.

use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use horizon_waypoint_core::Rect;

use crate::screen::Surface;

/// Direction and kind of a visual change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionOperation {
    /// Modal show: present, overlay, popover.
    Present,
    /// Modal hide.
    Dismiss,
    /// Navigational show on a stack.
    Push,
    /// Navigational hide on a stack.
    Pop,
}

impl TransitionOperation {
    /// Whether the destination becomes visible.
    pub fn is_show(self) -> bool {
        matches!(self, Self::Present | Self::Push)
    }

    /// Whether this is a modal (present/dismiss) rather than stack change.
    pub fn is_modal(self) -> bool {
        matches!(self, Self::Present | Self::Dismiss)
    }

    /// The operation that undoes this one.
    pub fn reversed(self) -> Self {
        match self {
            Self::Present => Self::Dismiss,
            Self::Dismiss => Self::Present,
            Self::Push => Self::Pop,
            Self::Pop => Self::Push,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Dismiss => "dismiss",
            Self::Push => "push",
            Self::Pop => "pop",
        }
    }
}

impl fmt::Display for TransitionOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Surfaces and timing handed to a transition style.
///
/// `from` is the surface leaving (or being covered), `to` the one arriving
/// (or being revealed). Either may be absent.
#[derive(Debug, Clone)]
pub struct TransitionContext {
    pub operation: TransitionOperation,
    pub from: Option<Rc<Surface>>,
    pub to: Option<Rc<Surface>>,
    /// Bounds of the container the change happens in.
    pub container: Rect,
    pub duration: Duration,
    /// Dimming backdrop of overlay and popover presentations.
    pub backdrop: Option<Rc<Surface>>,
    pub backdrop_alpha: f32,
}

impl TransitionContext {
    pub fn new(operation: TransitionOperation, container: Rect, duration: Duration) -> Self {
        Self {
            operation,
            from: None,
            to: None,
            container,
            duration,
            backdrop: None,
            backdrop_alpha: 0.0,
        }
    }

    pub fn with_from(mut self, from: Option<Rc<Surface>>) -> Self {
        self.from = from;
        self
    }

    pub fn with_to(mut self, to: Option<Rc<Surface>>) -> Self {
        self.to = to;
        self
    }

    pub fn with_backdrop(mut self, backdrop: Option<Rc<Surface>>, alpha: f32) -> Self {
        self.backdrop = backdrop;
        self.backdrop_alpha = alpha;
        self
    }

    /// The surface that moves: `to` when showing, `from` when hiding.
    pub fn moving(&self) -> Option<&Rc<Surface>> {
        if self.operation.is_show() {
            self.to.as_ref()
        } else {
            self.from.as_ref()
        }
    }

    /// The surface that stays mostly put underneath.
    pub fn underneath(&self) -> Option<&Rc<Surface>> {
        if self.operation.is_show() {
            self.from.as_ref()
        } else {
            self.to.as_ref()
        }
    }
}
