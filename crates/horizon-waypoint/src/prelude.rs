//! Prelude module for Horizon Waypoint.
//!
//! ```ignore
//! use horizon_waypoint::prelude::*;
//! ```
//!
//! Brings in the context and navigators, requests and their data, screens
//! and their content trait, the window and the geometry types.

// ============================================================================
// Navigation
// ============================================================================

pub use crate::navigator::{BackTarget, NavigationContext, NavigationEvent, Navigator};
pub use crate::page::{DisplayMode, PageData, PageOption, PageRequest, SourceGeometry};
pub use crate::registry::builtin;

// ============================================================================
// Screens
// ============================================================================

pub use crate::screen::{ContainerKind, Screen, ScreenContent, ScreenRef};
pub use crate::window::Window;

// ============================================================================
// Transitions and gestures
// ============================================================================

pub use crate::transition::{PanSample, TransitionStyle};

// ============================================================================
// Setup
// ============================================================================

pub use crate::config::NavigatorConfig;
pub use crate::error::NavigationError;

// ============================================================================
// Geometry
// ============================================================================

pub use horizon_waypoint_core::{Point, Rect, Size};
