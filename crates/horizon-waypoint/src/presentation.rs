//! Overlay and popover presentation hosts.
//!
//! A [`PresentationHost`] owns the dimmed backdrop behind an overlay or
//! popover and answers where the presented content goes. The backdrop's
//! alpha is animated by the transition in step with the content and it is
//! removed from the hierarchy only after the dismissal completes.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use horizon_waypoint_core::{Point, Rect, Size};

use crate::screen::{Screen, ScreenRef, Surface};

/// Size of a popover whose content has no preference.
pub const DEFAULT_POPOVER_SIZE: Size = Size::new(320.0, 240.0);

/// Where a popover sits relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopoverPlacement {
    #[default]
    Below,
    Above,
    Left,
    Right,
    /// Centered over the anchor.
    Center,
}

impl PopoverPlacement {
    /// Position of a popover of `size` anchored at `anchor`.
    ///
    /// With `bounds`, the popover flips to the opposite side when it would
    /// overflow and is then shifted to stay inside.
    pub fn calculate_position(&self, anchor: Rect, size: Size, bounds: Option<Rect>) -> Point {
        let position = self.initial_position(anchor, size);
        match bounds {
            Some(bounds) => self.flip_and_shift(position, size, bounds, anchor),
            None => position,
        }
    }

    fn initial_position(&self, anchor: Rect, size: Size) -> Point {
        let center = anchor.center();
        match self {
            PopoverPlacement::Below => Point::new(center.x - size.width / 2.0, anchor.bottom()),
            PopoverPlacement::Above => {
                Point::new(center.x - size.width / 2.0, anchor.top() - size.height)
            }
            PopoverPlacement::Left => {
                Point::new(anchor.left() - size.width, center.y - size.height / 2.0)
            }
            PopoverPlacement::Right => Point::new(anchor.right(), center.y - size.height / 2.0),
            PopoverPlacement::Center => {
                Point::new(center.x - size.width / 2.0, center.y - size.height / 2.0)
            }
        }
    }

    fn flip_and_shift(&self, position: Point, size: Size, bounds: Rect, anchor: Rect) -> Point {
        let mut result = position;

        match self {
            PopoverPlacement::Below if position.y + size.height > bounds.bottom() => {
                result.y = anchor.top() - size.height;
            }
            PopoverPlacement::Above if position.y < bounds.top() => {
                result.y = anchor.bottom();
            }
            PopoverPlacement::Left if position.x < bounds.left() => {
                result.x = anchor.right();
            }
            PopoverPlacement::Right if position.x + size.width > bounds.right() => {
                result.x = anchor.left() - size.width;
            }
            _ => {}
        }

        // Shift to stay within bounds after flipping
        if result.x < bounds.left() {
            result.x = bounds.left();
        } else if result.x + size.width > bounds.right() {
            result.x = bounds.right() - size.width;
        }
        if result.y < bounds.top() {
            result.y = bounds.top();
        } else if result.y + size.height > bounds.bottom() {
            result.y = bounds.bottom() - size.height;
        }
        result
    }
}

/// Presentation style owning a backdrop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PresentationKind {
    /// Layered over the current screen, centered.
    Overlay,
    /// Anchored to a source rectangle.
    Popover { placement: PopoverPlacement },
}

/// Backdrop and geometry of one overlay or popover presentation.
#[derive(Debug)]
pub struct PresentationHost {
    kind: PresentationKind,
    screen: Weak<Screen>,
    backdrop: Rc<Surface>,
    backdrop_alpha: f32,
    dismiss_on_tap_outside: bool,
    source: Option<Rect>,
    content_frame: Cell<Rect>,
}

impl PresentationHost {
    pub fn new(
        kind: PresentationKind,
        screen: &ScreenRef,
        backdrop_alpha: f32,
        dismiss_on_tap_outside: bool,
        source: Option<Rect>,
    ) -> Rc<Self> {
        Rc::new(Self {
            kind,
            screen: Rc::downgrade(screen),
            backdrop: Rc::new(Surface::new()),
            backdrop_alpha,
            dismiss_on_tap_outside,
            source,
            content_frame: Cell::new(Rect::ZERO),
        })
    }

    pub fn kind(&self) -> PresentationKind {
        self.kind
    }

    /// The presented screen.
    pub fn screen(&self) -> Option<ScreenRef> {
        self.screen.upgrade()
    }

    pub fn backdrop(&self) -> &Rc<Surface> {
        &self.backdrop
    }

    /// Target dim level of the backdrop.
    pub fn backdrop_alpha(&self) -> f32 {
        self.backdrop_alpha
    }

    pub fn dismisses_on_tap_outside(&self) -> bool {
        self.dismiss_on_tap_outside
    }

    pub fn content_frame(&self) -> Rect {
        self.content_frame.get()
    }

    /// Where the presented content goes inside `bounds`.
    pub fn frame_of_presented_content(&self, bounds: Rect, preferred: Option<Size>) -> Rect {
        match self.kind {
            PresentationKind::Overlay => match preferred {
                Some(size) => Rect::from_center(bounds.center(), clamp_size(size, bounds.size)),
                None => bounds,
            },
            PresentationKind::Popover { placement } => {
                let size = clamp_size(preferred.unwrap_or(DEFAULT_POPOVER_SIZE), bounds.size);
                let anchor = self
                    .source
                    .unwrap_or_else(|| Rect::from_center(bounds.center(), Size::ZERO));
                let origin = placement.calculate_position(anchor, size, Some(bounds));
                Rect::new(origin.x, origin.y, size.width, size.height)
            }
        }
    }

    /// Attach the backdrop fully transparent and lay out the content.
    pub(crate) fn attach(&self, bounds: Rect) {
        self.backdrop.attach(bounds);
        self.backdrop.set_alpha(0.0);
        if let Some(screen) = self.screen() {
            let frame = self.frame_of_presented_content(bounds, screen.preferred_size());
            self.content_frame.set(frame);
            screen.attach_surfaces(frame);
        }
    }

    /// Remove the backdrop. Called once the dismissal has completed.
    pub(crate) fn detach(&self) {
        self.backdrop.detach();
    }

    /// Whether a tap at `point` should dismiss the presentation.
    pub fn should_dismiss_for_tap(&self, point: Point) -> bool {
        self.dismiss_on_tap_outside
            && self.backdrop.is_attached()
            && !self.content_frame.get().contains(point)
    }
}

fn clamp_size(size: Size, limit: Size) -> Size {
    Size::new(size.width.min(limit.width), size.height.min(limit.height))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Rect = Rect::new(0.0, 0.0, 400.0, 800.0);

    #[test]
    fn test_placement_below_and_flip() {
        let anchor = Rect::new(150.0, 100.0, 100.0, 40.0);
        let size = Size::new(200.0, 100.0);
        let below = PopoverPlacement::Below.calculate_position(anchor, size, Some(WINDOW));
        assert_eq!(below, Point::new(100.0, 140.0));

        let low_anchor = Rect::new(150.0, 740.0, 100.0, 40.0);
        let flipped = PopoverPlacement::Below.calculate_position(low_anchor, size, Some(WINDOW));
        assert_eq!(flipped, Point::new(100.0, 640.0));
    }

    #[test]
    fn test_placement_shifts_inside_bounds() {
        let anchor = Rect::new(0.0, 100.0, 40.0, 40.0);
        let size = Size::new(200.0, 100.0);
        let pos = PopoverPlacement::Below.calculate_position(anchor, size, Some(WINDOW));
        assert_eq!(pos.x, 0.0);

        let right = Rect::new(380.0, 300.0, 20.0, 20.0);
        let pos = PopoverPlacement::Right.calculate_position(right, size, Some(WINDOW));
        assert_eq!(pos.x, 180.0);
    }

    #[test]
    fn test_placement_without_bounds() {
        let anchor = Rect::new(0.0, 0.0, 10.0, 10.0);
        let pos = PopoverPlacement::Above.calculate_position(anchor, Size::new(20.0, 20.0), None);
        assert_eq!(pos, Point::new(-5.0, -20.0));
    }

    #[test]
    fn test_overlay_frame_centers_preferred_size() {
        let screen = Screen::blank("Toast");
        let host = PresentationHost::new(PresentationKind::Overlay, &screen, 0.4, true, None);
        let frame = host.frame_of_presented_content(WINDOW, Some(Size::new(200.0, 100.0)));
        assert_eq!(frame, Rect::new(100.0, 350.0, 200.0, 100.0));
        assert_eq!(host.frame_of_presented_content(WINDOW, None), WINDOW);
    }

    #[test]
    fn test_tap_outside() {
        let screen = Screen::blank("Menu");
        let host = PresentationHost::new(
            PresentationKind::Popover {
                placement: PopoverPlacement::Below,
            },
            &screen,
            0.4,
            true,
            Some(Rect::new(150.0, 100.0, 100.0, 40.0)),
        );
        host.attach(WINDOW);
        assert_eq!(host.content_frame(), Rect::new(40.0, 140.0, 320.0, 240.0));
        assert_eq!(host.backdrop().alpha(), 0.0);
        assert!(host.should_dismiss_for_tap(Point::new(10.0, 700.0)));
        assert!(!host.should_dismiss_for_tap(Point::new(200.0, 200.0)));

        host.detach();
        assert!(!host.should_dismiss_for_tap(Point::new(10.0, 700.0)));
    }
}
