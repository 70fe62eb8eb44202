//! Quadratic arc between two points on the globe surface

use glam::Vec3;
use serde::Serialize;

/// Number of divisions in the cumulative length table used by `point_at`
const ARC_LENGTH_DIVISIONS: usize = 200;

/// Quadratic Bézier through (start, control, end) with an arc-length table
#[derive(Clone, Debug, Serialize)]
pub struct Curve {
    start: Vec3,
    control: Vec3,
    end: Vec3,
    #[serde(skip)]
    lengths: Vec<f32>,
}

/// Build the arc between two surface points.
///
/// The control point sits on the ray through the chord midpoint, at
/// `radius + bow * |start - end|` from the origin, so longer hops arc higher.
pub fn build_arc(start: Vec3, end: Vec3, radius: f32, bow: f32) -> Curve {
    let height = radius + bow * start.distance(end);
    let direction = start
        .lerp(end, 0.5)
        .try_normalize()
        .or_else(|| start.try_normalize())
        .unwrap_or(Vec3::Y);
    Curve::new(start, direction * height, end)
}

impl Curve {
    pub fn new(start: Vec3, control: Vec3, end: Vec3) -> Self {
        let mut curve = Self { start, control, end, lengths: Vec::new() };
        curve.lengths = curve.cumulative_lengths();
        curve
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn control(&self) -> Vec3 {
        self.control
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    /// Total arc length (polyline approximation)
    pub fn length(&self) -> f32 {
        self.lengths.last().copied().unwrap_or(0.0)
    }

    /// Point at raw Bézier parameter `t` (clamped to [0, 1])
    pub fn point(&self, t: f32) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let k = 1.0 - t;
        self.start * (k * k) + self.control * (2.0 * k * t) + self.end * (t * t)
    }

    /// Point at arc-length fraction `u` (clamped to [0, 1]).
    /// Equal steps in `u` move equal distances along the curve.
    pub fn point_at(&self, u: f32) -> Vec3 {
        if u <= 0.0 {
            return self.start;
        }
        if u >= 1.0 {
            return self.end;
        }
        self.point(self.u_to_t(u))
    }

    /// `segments + 1` evenly spaced points (by arc length), both ends included
    pub fn sample(&self, segments: usize) -> Vec<Vec3> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.point_at(i as f32 / segments as f32))
            .collect()
    }

    fn cumulative_lengths(&self) -> Vec<f32> {
        let mut lengths = Vec::with_capacity(ARC_LENGTH_DIVISIONS + 1);
        let mut total = 0.0;
        let mut prev = self.start;
        lengths.push(0.0);
        for i in 1..=ARC_LENGTH_DIVISIONS {
            let p = self.point(i as f32 / ARC_LENGTH_DIVISIONS as f32);
            total += p.distance(prev);
            lengths.push(total);
            prev = p;
        }
        lengths
    }

    /// Map an arc-length fraction to the Bézier parameter by binary search
    /// over the length table, interpolating inside the found segment.
    fn u_to_t(&self, u: f32) -> f32 {
        let total = self.length();
        if total <= f32::EPSILON {
            return u;
        }
        let target = u * total;
        let idx = self.lengths.partition_point(|&l| l < target);
        if idx == 0 {
            return 0.0;
        }
        if idx >= self.lengths.len() {
            return 1.0;
        }
        let before = self.lengths[idx - 1];
        let after = self.lengths[idx];
        let segment = after - before;
        let frac = if segment > 0.0 { (target - before) / segment } else { 0.0 };
        (idx as f32 - 1.0 + frac) / ARC_LENGTH_DIVISIONS as f32
    }
}
