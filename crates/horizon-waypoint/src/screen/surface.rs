//! Animatable visual state of a screen.

use std::cell::Cell;

use horizon_waypoint_core::{Point, Rect};

/// The properties a transition animates.
///
/// A surface is what the rendering layer would read to place a screen: its
/// frame, a translation applied on top of the frame, opacity, uniform scale,
/// and whether it is currently part of the visual hierarchy.
#[derive(Debug)]
pub struct Surface {
    frame: Cell<Rect>,
    offset: Cell<Point>,
    alpha: Cell<f32>,
    scale: Cell<f32>,
    attached: Cell<bool>,
}

impl Surface {
    pub fn new() -> Self {
        Self {
            frame: Cell::new(Rect::ZERO),
            offset: Cell::new(Point::ZERO),
            alpha: Cell::new(1.0),
            scale: Cell::new(1.0),
            attached: Cell::new(false),
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame.get()
    }

    pub fn set_frame(&self, frame: Rect) {
        self.frame.set(frame);
    }

    pub fn offset(&self) -> Point {
        self.offset.get()
    }

    pub fn set_offset(&self, offset: Point) {
        self.offset.set(offset);
    }

    pub fn alpha(&self) -> f32 {
        self.alpha.get()
    }

    pub fn set_alpha(&self, alpha: f32) {
        self.alpha.set(alpha.clamp(0.0, 1.0));
    }

    pub fn scale(&self) -> f32 {
        self.scale.get()
    }

    pub fn set_scale(&self, scale: f32) {
        self.scale.set(scale);
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    /// Insert into the visual hierarchy with `frame`.
    pub fn attach(&self, frame: Rect) {
        self.frame.set(frame);
        self.attached.set(true);
    }

    /// Remove from the visual hierarchy and clear transient animation state.
    pub fn detach(&self) {
        self.attached.set(false);
        self.settle();
    }

    /// Clear offset, alpha and scale back to their resting values.
    pub fn settle(&self) {
        self.offset.set(Point::ZERO);
        self.alpha.set(1.0);
        self.scale.set(1.0);
    }

    /// Frame translated by the current offset.
    pub fn presented_frame(&self) -> Rect {
        let frame = self.frame.get();
        let offset = self.offset.get();
        Rect::new(
            frame.origin.x + offset.x,
            frame.origin.y + offset.y,
            frame.width(),
            frame.height(),
        )
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new()
    }
}
