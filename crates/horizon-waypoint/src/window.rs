//! The host window.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use horizon_waypoint_core::logging::targets;
use horizon_waypoint_core::Rect;

use crate::screen::ScreenRef;

/// The top-level host that owns the root screen.
///
/// Stands in for the platform window: it has bounds and a single root
/// screen. Everything else hangs off the root.
#[derive(Debug)]
pub struct Window {
    bounds: Cell<Rect>,
    root: RefCell<Option<ScreenRef>>,
}

impl Window {
    pub fn new(bounds: Rect) -> Rc<Self> {
        Rc::new(Self {
            bounds: Cell::new(bounds),
            root: RefCell::new(None),
        })
    }

    pub fn bounds(&self) -> Rect {
        self.bounds.get()
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.bounds.set(bounds);
    }

    pub fn root(&self) -> Option<ScreenRef> {
        self.root.borrow().clone()
    }

    /// Install `screen` as the root.
    ///
    /// Any modal chain presented over the previous root is unwound first so
    /// no presented screen outlives the root it was presented from. Returns
    /// the previous root.
    pub fn set_root(&self, screen: ScreenRef) -> Option<ScreenRef> {
        let previous = self.root.borrow_mut().take();
        if let Some(old) = &previous {
            let unwound = old.unwind();
            if !unwound.is_empty() {
                tracing::debug!(target: targets::NAVIGATOR, count = unwound.len(), "unwound modal chain before replacing root");
            }
            old.detach_surfaces();
        }
        screen.attach_surfaces(self.bounds());
        *self.root.borrow_mut() = Some(screen);
        previous
    }

    /// The topmost visible screen.
    pub fn top_screen(&self) -> Option<ScreenRef> {
        self.root().map(|root| root.visible_top())
    }

    /// The screen new modal presentations attach to.
    pub fn top_presenter(&self) -> Option<ScreenRef> {
        self.root().map(|root| root.top_presenter())
    }
}
