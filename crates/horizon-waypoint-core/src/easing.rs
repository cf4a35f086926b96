//! Easing curves applied to transition progress.
//!
//! An easing curve maps linear progress `t` in `0.0..=1.0` to the value fed
//! to a transition frame. Percent-driven (interactive) animations use
//! [`Easing::Linear`] so the content tracks the finger exactly.

use std::f32::consts::FRAC_PI_2;

/// Available easing curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// No easing.
    #[default]
    Linear,
    /// Quadratic, slow start.
    EaseIn,
    /// Quadratic, slow end.
    EaseOut,
    /// Quadratic, slow start and end.
    EaseInOut,
    /// Cubic deceleration, the usual curve for push and present.
    EaseOutCubic,
    /// Sinusoidal deceleration, used by fades.
    EaseOutSine,
}

/// Apply an easing curve to a progress value.
///
/// Input outside `0.0..=1.0` is clamped.
///
/// ```
/// use horizon_waypoint_core::{ease, Easing};
///
/// assert_eq!(ease(Easing::Linear, 0.25), 0.25);
/// assert!(ease(Easing::EaseOutCubic, 0.5) > 0.5);
/// ```
#[inline]
pub fn ease(easing: Easing, t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;

    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - inv * inv,
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - 2.0 * inv * inv
            }
        }
        Easing::EaseOutCubic => 1.0 - inv * inv * inv,
        Easing::EaseOutSine => (t * FRAC_PI_2).sin(),
    }
}

/// Interpolate between `from` and `to` at linear progress `t`.
#[inline]
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::EaseIn,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::EaseOutCubic,
        Easing::EaseOutSine,
    ];

    #[test]
    fn test_endpoints_are_fixed() {
        for easing in ALL {
            assert!(ease(easing, 0.0).abs() < 1e-5, "{easing:?} at 0");
            assert!((ease(easing, 1.0) - 1.0).abs() < 1e-5, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_ease_in_out_midpoint() {
        assert_eq!(ease(Easing::EaseInOut, 0.5), 0.5);
        assert!(ease(Easing::EaseIn, 0.5) < 0.5);
        assert!(ease(Easing::EaseOut, 0.5) > 0.5);
    }

    #[test]
    fn test_clamps_input() {
        assert_eq!(ease(Easing::Linear, -1.0), 0.0);
        assert_eq!(ease(Easing::Linear, 3.0), 1.0);
    }

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(100.0, 200.0, 0.5), 150.0);
        assert_eq!(lerp(1.0, 0.0, 0.25), 0.75);
    }
}
