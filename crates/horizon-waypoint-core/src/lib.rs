//! Core primitives for Horizon Waypoint.
//!
//! This crate holds the pieces of the navigation engine that know nothing
//! about screens:
//!
//! - **Geometry**: [`Point`], [`Size`], [`Rect`], [`Edges`], [`Orientation`]
//! - **Easing**: curves applied to transition progress
//! - **Animator**: the frame-driven animation primitive, timed and
//!   percent-driven
//! - **Signals**: direct-invocation signal/slot notifications
//! - **Logging**: tracing targets, span names, [`PerfSpan`] and macros
//!
//! Everything here is meant for the UI thread. [`Animator`] is deliberately
//! `!Send`; [`Signal`] is `Send + Sync` so observers can live anywhere.

pub mod animator;
pub mod easing;
mod error;
pub mod geometry;
pub mod logging;
pub mod signal;

pub use animator::{AnimationId, Animator, Drive, FinishFn, FrameFn};
pub use easing::{ease, lerp, Easing};
pub use error::{CoreError, Result};
pub use geometry::{Edges, Orientation, Point, Rect, Size};
pub use logging::PerfSpan;
pub use signal::{ConnectionId, Signal};

static_assertions::assert_not_impl_any!(Animator: Send, Sync);
