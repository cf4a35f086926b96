//! Pan-gesture samples and the math that turns them into progress.

use horizon_waypoint_core::{Edges, Orientation, Point, Size};

use crate::config::NavigatorConfig;

/// Phase of a continuous pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
    Failed,
}

/// One sample from a pan gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSample {
    pub phase: PanPhase,
    /// Touch location in window coordinates.
    pub location: Point,
    /// Distance moved since the gesture began.
    pub translation: Point,
    /// Points per second.
    pub velocity: Point,
}

impl PanSample {
    pub fn began(location: Point) -> Self {
        Self {
            phase: PanPhase::Began,
            location,
            translation: Point::ZERO,
            velocity: Point::ZERO,
        }
    }

    pub fn changed(translation: Point) -> Self {
        Self {
            phase: PanPhase::Changed,
            location: Point::ZERO,
            translation,
            velocity: Point::ZERO,
        }
    }

    pub fn ended(translation: Point, velocity: Point) -> Self {
        Self {
            phase: PanPhase::Ended,
            location: Point::ZERO,
            translation,
            velocity,
        }
    }

    pub fn cancelled() -> Self {
        Self {
            phase: PanPhase::Cancelled,
            location: Point::ZERO,
            translation: Point::ZERO,
            velocity: Point::ZERO,
        }
    }

    pub fn failed() -> Self {
        Self {
            phase: PanPhase::Failed,
            ..Self::cancelled()
        }
    }
}

/// Thresholds and speeds of interactive transitions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractiveTuning {
    pub threshold: f32,
    pub velocity_projection: f32,
    pub cancel_speed: f32,
    pub min_finish_speed: f32,
    pub edge_zone: f32,
}

impl From<&NavigatorConfig> for InteractiveTuning {
    fn from(config: &NavigatorConfig) -> Self {
        Self {
            threshold: config.interactive_threshold,
            velocity_projection: config.velocity_projection,
            cancel_speed: config.cancel_speed,
            min_finish_speed: config.min_finish_speed,
            edge_zone: config.edge_zone,
        }
    }
}

impl Default for InteractiveTuning {
    fn default() -> Self {
        Self::from(&NavigatorConfig::default())
    }
}

/// Whether the gesture runs against the axis: a right-edge pan moves left,
/// a bottom-edge pan moves up.
fn is_reverse(orientation: Orientation, edges: Edges) -> bool {
    match orientation {
        Orientation::Horizontal => edges.has(Edges::RIGHT) && !edges.has(Edges::LEFT),
        Orientation::Vertical => edges.has(Edges::BOTTOM) && !edges.has(Edges::TOP),
    }
}

/// Signed distance along the gesture's axis, positive toward completion.
fn along_axis(orientation: Orientation, edges: Edges, value: Point) -> f32 {
    let raw = match orientation {
        Orientation::Horizontal => value.x,
        Orientation::Vertical => value.y,
    };
    if is_reverse(orientation, edges) { -raw } else { raw }
}

fn dimension(orientation: Orientation, size: Size) -> f32 {
    match orientation {
        Orientation::Horizontal => size.width,
        Orientation::Vertical => size.height,
    }
}

/// Map a translation to completion in `0.0..=1.0`.
pub fn percent_complete(orientation: Orientation, edges: Edges, translation: Point, size: Size) -> f32 {
    let extent = dimension(orientation, size);
    if extent <= 0.0 {
        return 0.0;
    }
    (along_axis(orientation, edges, translation) / extent).clamp(0.0, 1.0)
}

/// Whether a released gesture should complete the transition.
///
/// The translation is biased by the velocity projected over
/// `velocity_projection` seconds and compared against `threshold` of the
/// relevant dimension.
pub fn should_finish(
    orientation: Orientation,
    edges: Edges,
    translation: Point,
    velocity: Point,
    size: Size,
    tuning: &InteractiveTuning,
) -> bool {
    let offset = along_axis(orientation, edges, translation)
        + along_axis(orientation, edges, velocity) * tuning.velocity_projection;
    offset > dimension(orientation, size) * tuning.threshold
}

/// Completion speed for the remaining part of a finishing gesture.
pub fn finish_speed(percent: f32, tuning: &InteractiveTuning) -> f32 {
    (1.0 - percent).max(tuning.min_finish_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHONE: Size = Size::new(400.0, 800.0);

    #[test]
    fn test_horizontal_percent() {
        let p = percent_complete(Orientation::Horizontal, Edges::LEFT, Point::new(100.0, 30.0), PHONE);
        assert_eq!(p, 0.25);
        let clamped =
            percent_complete(Orientation::Horizontal, Edges::LEFT, Point::new(-50.0, 0.0), PHONE);
        assert_eq!(clamped, 0.0);
    }

    #[test]
    fn test_reverse_edge_inverts_sign() {
        let p = percent_complete(Orientation::Horizontal, Edges::RIGHT, Point::new(-200.0, 0.0), PHONE);
        assert_eq!(p, 0.5);
        let up = percent_complete(Orientation::Vertical, Edges::BOTTOM, Point::new(0.0, -400.0), PHONE);
        assert_eq!(up, 0.5);
    }

    #[test]
    fn test_vertical_uses_height() {
        let p = percent_complete(Orientation::Vertical, Edges::TOP, Point::new(300.0, 200.0), PHONE);
        assert_eq!(p, 0.25);
    }

    #[test]
    fn test_decision_against_half_dimension() {
        let tuning = InteractiveTuning::default();
        let slow_short = should_finish(
            Orientation::Horizontal,
            Edges::LEFT,
            Point::new(150.0, 0.0),
            Point::new(100.0, 0.0),
            PHONE,
            &tuning,
        );
        assert!(!slow_short);

        let flicked = should_finish(
            Orientation::Horizontal,
            Edges::LEFT,
            Point::new(150.0, 0.0),
            Point::new(800.0, 0.0),
            PHONE,
            &tuning,
        );
        assert!(flicked);

        let far = should_finish(
            Orientation::Vertical,
            Edges::TOP,
            Point::new(0.0, 500.0),
            Point::ZERO,
            PHONE,
            &tuning,
        );
        assert!(far);
    }

    #[test]
    fn test_finish_speed_has_floor() {
        let tuning = InteractiveTuning::default();
        assert!((finish_speed(0.4, &tuning) - 0.6).abs() < 1e-6);
        assert_eq!(finish_speed(0.95, &tuning), tuning.min_finish_speed);
    }

    #[test]
    fn test_failed_sample() {
        let sample = PanSample::failed();
        assert_eq!(sample.phase, PanPhase::Failed);
        assert_eq!(sample.translation, Point::ZERO);
    }
}
