//! Stock transition styles.
//!
//! | name      | used for                    | interactive          |
//! |-----------|-----------------------------|----------------------|
//! | `none`    | instant changes             | no                   |
//! | `fade`    | root resets                 | no                   |
//! | `slide`   | stack push/pop              | left edge, horizontal|
//! | `cover`   | modal present/dismiss       | top edge, vertical   |
//! | `overlay` | overlays with a backdrop    | no                   |
//! | `popover` | anchored popovers           | no                   |

use std::rc::Rc;
use std::time::Duration;

use horizon_waypoint_core::{lerp, Easing, Edges, FrameFn, Orientation, Point};

use super::{TransitionContext, TransitionStyle};
use crate::registry::builtin;
use crate::screen::Surface;

/// Progress of the moving surface toward "visible": `p` when showing,
/// `1 - p` when hiding.
fn visibility(context: &TransitionContext, progress: f32) -> f32 {
    if context.operation.is_show() {
        progress
    } else {
        1.0 - progress
    }
}

fn backdrop_frame(context: &TransitionContext) -> Option<(Rc<Surface>, f32)> {
    context
        .backdrop
        .clone()
        .map(|backdrop| (backdrop, context.backdrop_alpha))
}

/// No animation at all.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTransition;

impl TransitionStyle for NoTransition {
    fn name(&self) -> &str {
        builtin::NONE
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::ZERO)
    }
}

/// Cross-fade of the moving surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct Fade;

impl Fade {
    fn frame(context: &TransitionContext) -> Option<FrameFn> {
        let moving = context.moving()?.clone();
        let context = context.clone();
        Some(Box::new(move |progress| {
            moving.set_alpha(visibility(&context, progress));
        }))
    }
}

impl TransitionStyle for Fade {
    fn name(&self) -> &str {
        builtin::FADE
    }

    fn easing(&self) -> Easing {
        Easing::EaseOut
    }

    fn animate_presentation(&self, context: &TransitionContext) -> Option<FrameFn> {
        Self::frame(context)
    }

    fn animate_navigation(&self, context: &TransitionContext) -> Option<FrameFn> {
        Self::frame(context)
    }
}

/// Horizontal slide, the stack default.
///
/// On a push the incoming surface enters from the right while the outgoing
/// one leaves to the left; a pop mirrors it.
#[derive(Debug, Default, Clone, Copy)]
pub struct Slide;

impl Slide {
    /// X offset of the surface becoming visible.
    pub fn incoming_offset(forward: bool, progress: f32, width: f32) -> f32 {
        if forward {
            width * (1.0 - progress)
        } else {
            -width * (1.0 - progress)
        }
    }

    /// X offset of the surface going away.
    pub fn outgoing_offset(forward: bool, progress: f32, width: f32) -> f32 {
        if forward {
            -width * progress
        } else {
            width * progress
        }
    }

    fn frame(context: &TransitionContext) -> Option<FrameFn> {
        let forward = context.operation.is_show();
        let width = context.container.width();
        let (incoming, outgoing) = (context.to.clone(), context.from.clone());
        context.moving()?;

        Some(Box::new(move |progress| {
            if let Some(surface) = &incoming {
                let x = Slide::incoming_offset(forward, progress, width);
                surface.set_offset(Point::new(x, 0.0));
            }
            if let Some(surface) = &outgoing {
                let x = Slide::outgoing_offset(forward, progress, width);
                surface.set_offset(Point::new(x, 0.0));
            }
        }))
    }
}

impl TransitionStyle for Slide {
    fn name(&self) -> &str {
        builtin::SLIDE
    }

    fn interactive_edges(&self) -> Edges {
        Edges::LEFT
    }

    fn easing(&self) -> Easing {
        Easing::EaseOutCubic
    }

    fn animate_presentation(&self, context: &TransitionContext) -> Option<FrameFn> {
        Self::frame(context)
    }

    fn animate_navigation(&self, context: &TransitionContext) -> Option<FrameFn> {
        Self::frame(context)
    }
}

/// Vertical cover from the bottom, the modal default.
#[derive(Debug, Default, Clone, Copy)]
pub struct Cover;

impl Cover {
    fn frame(context: &TransitionContext) -> Option<FrameFn> {
        let moving = context.moving()?.clone();
        let height = context.container.height();
        let context = context.clone();
        Some(Box::new(move |progress| {
            let hidden = 1.0 - visibility(&context, progress);
            moving.set_offset(Point::new(0.0, height * hidden));
        }))
    }
}

impl TransitionStyle for Cover {
    fn name(&self) -> &str {
        builtin::COVER
    }

    fn orientation(&self) -> Orientation {
        Orientation::Vertical
    }

    fn interactive_edges(&self) -> Edges {
        Edges::TOP
    }

    fn easing(&self) -> Easing {
        Easing::EaseOutSine
    }

    fn animate_presentation(&self, context: &TransitionContext) -> Option<FrameFn> {
        Self::frame(context)
    }

    fn animate_navigation(&self, context: &TransitionContext) -> Option<FrameFn> {
        Self::frame(context)
    }
}

/// Fade over a dimmed backdrop.
#[derive(Debug, Default, Clone, Copy)]
pub struct OverlayStyle;

impl TransitionStyle for OverlayStyle {
    fn name(&self) -> &str {
        builtin::OVERLAY
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(250))
    }

    fn animate_presentation(&self, context: &TransitionContext) -> Option<FrameFn> {
        let moving = context.moving()?.clone();
        let backdrop = backdrop_frame(context);
        let context = context.clone();
        Some(Box::new(move |progress| {
            let shown = visibility(&context, progress);
            moving.set_alpha(shown);
            if let Some((backdrop, alpha)) = &backdrop {
                backdrop.set_alpha(alpha * shown);
            }
        }))
    }
}

/// Scale-and-fade from the anchor, over a dimmed backdrop.
#[derive(Debug, Default, Clone, Copy)]
pub struct PopoverStyle;

impl TransitionStyle for PopoverStyle {
    fn name(&self) -> &str {
        builtin::POPOVER
    }

    fn duration(&self) -> Option<Duration> {
        Some(Duration::from_millis(200))
    }

    fn easing(&self) -> Easing {
        Easing::EaseOut
    }

    fn animate_presentation(&self, context: &TransitionContext) -> Option<FrameFn> {
        let moving = context.moving()?.clone();
        let backdrop = backdrop_frame(context);
        let context = context.clone();
        Some(Box::new(move |progress| {
            let shown = visibility(&context, progress);
            moving.set_alpha(shown);
            moving.set_scale(lerp(0.85, 1.0, shown));
            if let Some((backdrop, alpha)) = &backdrop {
                backdrop.set_alpha(alpha * shown);
            }
        }))
    }
}
