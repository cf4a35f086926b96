//! Deep links: request chains replayed hop by hop.

use horizon_waypoint_core::logging::{span_names, targets};
use horizon_waypoint_core::PerfSpan;

use super::Navigator;
use crate::page::{DisplayMode, PageRequest};

impl Navigator {
    /// Replay a request chain starting on this navigator.
    ///
    /// Every hop is shown in order and only the last one is animated.
    ///
    /// # Panics
    ///
    /// The root navigator only accepts reset-mode chains and every other
    /// navigator rejects them. Use [`NavigationContext::deep_link`] to route
    /// a chain automatically.
    ///
    /// [`NavigationContext::deep_link`]: super::NavigationContext::deep_link
    pub fn deep_link(&self, request: PageRequest) {
        if self.is_root {
            assert!(
                request.mode() == DisplayMode::Reset,
                "the root navigator only accepts reset-mode deep links, got {}",
                request.mode()
            );
        } else {
            assert!(
                request.mode() != DisplayMode::Reset,
                "scoped navigators do not accept reset-mode deep links"
            );
        }
        self.follow(request);
    }

    /// Replay a chain without checking the mode against the scope.
    pub(crate) fn follow(&self, mut request: PageRequest) {
        let Some(context) = self.context() else {
            return;
        };
        let _span = PerfSpan::new(span_names::DEEP_LINK);
        tracing::debug!(target: targets::NAVIGATOR, hops = request.chain_len(), first = request.target().name(), "following deep link");
        if let Some(this) = self.this.upgrade() {
            context.set_current(&this);
        }

        if request.mode() == DisplayMode::Goto {
            let next = request.take_next();
            let found = context.goto(request.target().name(), request.data().cloned(), next.is_none());
            if !found {
                tracing::warn!(target: targets::NAVIGATOR, type_name = request.target().name(), "deep link goto target missing");
            }
            if let Some(next) = next {
                context.current().follow(next);
            }
            return;
        }

        let mut next = request.take_next();
        if next.is_none() {
            self.open(request, true, None);
            return;
        }
        self.show(request, false, None);
        while let Some(mut hop) = next {
            next = hop.take_next();
            let animated = next.is_none();
            if hop.mode() == DisplayMode::Goto {
                context.goto(hop.target().name(), hop.data().cloned(), animated);
            } else {
                context.current().show(hop, animated, None);
            }
        }
    }
}
