//! Horizon Waypoint - screen navigation and transition orchestration.
//!
//! Screens are shown from [`PageRequest`]s: a target (registered name or
//! factory), a [`DisplayMode`] and options such as a wrapping container,
//! business data, a transition style or a popover anchor. A [`Navigator`]
//! resolves the request, wires containers, tracks the result on its
//! [`NavigationStack`] and animates it with a [`Transition`]. Dismissals
//! address the stack by level, hand data back to the screen underneath and
//! can be driven interactively by pan gestures.
//!
//! # Example
//!
//! ```no_run
//! use horizon_waypoint::prelude::*;
//!
//! struct Inbox;
//! impl ScreenContent for Inbox {}
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let window = Window::new(Rect::new(0.0, 0.0, 390.0, 844.0));
//!     let context = NavigationContext::new(window, NavigatorConfig::default());
//!     context.register_screen("Inbox", || Inbox)?;
//!
//!     let root = context.root_navigator();
//!     root.open(
//!         PageRequest::new("Inbox").container(builtin::STACK_CONTAINER),
//!         false,
//!         None,
//!     );
//!     context.run_until_idle();
//!     Ok(())
//! }
//! ```
//!
//! Everything here lives on the UI thread: navigators and screens are
//! neither `Send` nor `Sync`, and time only moves when the host ticks the
//! [`Animator`](horizon_waypoint_core::Animator).

pub mod config;
pub mod debug;
pub mod error;
pub mod navigator;
pub mod page;
pub mod prelude;
pub mod presentation;
pub mod registry;
pub mod screen;
pub mod stack;
pub mod transition;
pub mod window;

pub use horizon_waypoint_core::logging;
pub use horizon_waypoint_core::{
    ease, lerp, Animator, ConnectionId, Easing, Edges, Orientation, PerfSpan, Point, Rect, Signal,
    Size,
};

pub use config::NavigatorConfig;
pub use debug::{ScreenTreeDebug, TreeFormatOptions, TreeStyle};
pub use error::{ConfigError, NavigationError, RegistryError, ResolveError, Result};
pub use navigator::{
    BackTarget, NavigationContext, NavigationEvent, Navigator, NavigatorState, OperationKind,
    PendingOperation,
};
pub use page::{Completion, DisplayMode, PageData, PageOption, PageRequest, ScreenTarget, SourceGeometry};
pub use presentation::{PopoverPlacement, PresentationHost, PresentationKind};
pub use registry::{builtin, ScreenRegistry, TransitionRegistry};
pub use screen::{live_screen_count, ContainerKind, Screen, ScreenContent, ScreenId, ScreenRef, Surface};
pub use stack::{NavigationStack, StackEntry};
pub use transition::{
    PanPhase, PanSample, Transition, TransitionContext, TransitionOperation, TransitionStyle,
};
pub use window::Window;

static_assertions::assert_not_impl_any!(Navigator: Send, Sync);
static_assertions::assert_not_impl_any!(NavigationContext: Send, Sync);
static_assertions::assert_not_impl_any!(Screen: Send, Sync);
static_assertions::assert_impl_all!(Signal<NavigationEvent>: Send, Sync);
