//! Per-frame marker motion along an arc
//!
//! `render` is a pure function of (curve, progress, clock); the only state
//! that persists between frames is the `Progress` accumulator.

use super::curve::Curve;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Animation phase of an arc, always in [0, 1)
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize)]
pub struct Progress(f32);

impl Progress {
    /// Wrap any finite value into [0, 1)
    pub fn new(value: f32) -> Self {
        Self(wrap_unit(value))
    }

    pub fn value(self) -> f32 {
        self.0
    }

    /// `(progress + step) mod 1`
    pub fn advance(&mut self, step: f32) {
        self.0 = wrap_unit(self.0 + step);
    }

    /// Phase of the trailing marker: `(progress - lag + 1) mod 1`
    pub fn lagged(self, lag: f32) -> f32 {
        wrap_unit(self.0 - lag + 1.0)
    }
}

/// `rem_euclid` can round up to exactly 1.0 for tiny negative inputs
fn wrap_unit(x: f32) -> f32 {
    let w = x.rem_euclid(1.0);
    if w >= 1.0 || !w.is_finite() {
        0.0
    } else {
        w
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionParams {
    /// Progress added per rendered frame
    pub step: f32,
    /// Phase distance between head and tail markers
    pub lag: f32,
    /// Phase distance to the point the head faces
    pub look_ahead: f32,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            step: 0.0025,
            lag: 0.05,
            look_ahead: 0.01,
        }
    }
}

/// Placement of one marker: where it is and which point it faces
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MarkerTransform {
    pub position: Vec3,
    pub facing: Vec3,
    pub scale: f32,
}

impl MarkerTransform {
    /// Unit direction from position toward the faced point (zero if degenerate)
    pub fn direction(&self) -> Vec3 {
        (self.facing - self.position).normalize_or_zero()
    }
}

/// Render transforms of an arc's head and tail markers for one frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct ArcFrame {
    pub head: MarkerTransform,
    pub tail: MarkerTransform,
}

pub fn render(curve: &Curve, progress: Progress, clock_secs: f32, params: &MotionParams) -> ArcFrame {
    let p = progress.value();
    let head_pos = curve.point_at(p);
    let ahead = curve.point_at((p + params.look_ahead).min(1.0));
    let tail_pos = curve.point_at(progress.lagged(params.lag));

    ArcFrame {
        head: MarkerTransform {
            position: head_pos,
            facing: ahead,
            scale: head_pulse(clock_secs),
        },
        tail: MarkerTransform {
            position: tail_pos,
            facing: head_pos,
            scale: 1.0,
        },
    }
}

/// Head marker pulse
pub fn head_pulse(clock_secs: f32) -> f32 {
    1.0 + (clock_secs * 10.0).sin() * 0.2
}

/// Node marker pulse
pub fn node_pulse(clock_secs: f32) -> f32 {
    1.0 + (clock_secs * 4.0).sin() * 0.15
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::curve::build_arc;
    use approx::assert_relative_eq;

    fn quarter_arc() -> Curve {
        build_arc(Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0), 2.0, 0.5)
    }

    #[test]
    fn advance_wraps_past_one() {
        let mut p = Progress::new(0.999);
        p.advance(0.0025);
        assert_relative_eq!(p.value(), 0.0015, epsilon = 1e-5);
        assert!(p.value() < 1.0);
    }

    #[test]
    fn n_advances_match_closed_form() {
        let initial = 0.37_f32;
        let step = 0.002_f32;
        let mut p = Progress::new(initial);
        for n in 1..=2000u32 {
            p.advance(step);
            let expected = (initial as f64 + n as f64 * step as f64).rem_euclid(1.0) as f32;
            let diff = (p.value() - expected).abs();
            // Near the wrap point either side of 0/1 is the same phase
            assert!(diff < 1e-3 || (1.0 - diff) < 1e-3, "n={n} got {} want {expected}", p.value());
            assert!((0.0..1.0).contains(&p.value()));
        }
    }

    #[test]
    fn new_wraps_out_of_range_values() {
        assert_relative_eq!(Progress::new(1.25).value(), 0.25, epsilon = 1e-6);
        assert_relative_eq!(Progress::new(-0.25).value(), 0.75, epsilon = 1e-6);
        assert_eq!(Progress::new(1.0).value(), 0.0);
        assert!(Progress::new(-1e-9).value() < 1.0);
    }

    #[test]
    fn tail_trails_head_by_lag() {
        let curve = quarter_arc();
        let params = MotionParams::default();
        let progress = Progress::new(0.5);
        let frame = render(&curve, progress, 0.0, &params);
        assert_eq!(frame.tail.position, curve.point_at(progress.lagged(params.lag)));
        assert_relative_eq!(frame.tail.position.distance(curve.point_at(0.45)), 0.0, epsilon = 1e-4);
        assert_eq!(frame.head.position, curve.point_at(0.5));
        assert_ne!(frame.head.position, frame.tail.position);
        assert_eq!(frame.tail.facing, frame.head.position);
    }

    #[test]
    fn tail_wraps_to_end_of_curve_near_start() {
        let curve = quarter_arc();
        let params = MotionParams::default();
        let frame = render(&curve, Progress::new(0.01), 0.0, &params);
        assert_relative_eq!(frame.tail.position.distance(curve.point_at(0.96)), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn zero_lag_puts_tail_on_head() {
        let curve = quarter_arc();
        let params = MotionParams { lag: 1.0, ..MotionParams::default() };
        let frame = render(&curve, Progress::new(0.3), 0.0, &params);
        assert_relative_eq!(frame.head.position.distance(frame.tail.position), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn head_faces_along_the_curve() {
        let curve = quarter_arc();
        let frame = render(&curve, Progress::new(0.2), 0.0, &MotionParams::default());
        let tangent = (curve.point_at(0.21) - curve.point_at(0.2)).normalize();
        assert_relative_eq!(frame.head.direction().dot(tangent), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn look_ahead_clamps_at_curve_end() {
        let curve = quarter_arc();
        let frame = render(&curve, Progress::new(0.995), 0.0, &MotionParams::default());
        assert_eq!(frame.head.facing, curve.end());
    }

    #[test]
    fn pulses_stay_in_band() {
        for i in 0..100 {
            let t = i as f32 * 0.137;
            let h = head_pulse(t);
            let n = node_pulse(t);
            assert!((0.8..=1.2).contains(&h));
            assert!((0.85..=1.15).contains(&n));
        }
    }
}
