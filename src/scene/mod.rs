//! Globe scene: surface nodes and the arcs of attack traffic between them

pub mod curve;
pub mod motion;

use crate::config::GlobeConfig;
use crossterm::style::Color;
use curve::{build_arc, Curve};
use glam::Vec3;
use motion::{ArcFrame, MotionParams, Progress};
use rand::prelude::*;
use serde::Serialize;
use std::f32::consts::{PI, TAU};
use tracing::debug;

/// Height of node markers above the sphere surface
const NODE_LIFT: f32 = 0.01;

/// Inclination band nodes are drawn from, as fractions of PI
const NODE_PHI_MIN: f32 = 0.15;
const NODE_PHI_SPAN: f32 = 0.5;

/// Arc ribbon colors: blue, emerald, amber, violet
pub const ARC_PALETTE: [(u8, u8, u8); 4] = [
    (59, 130, 246),
    (16, 185, 129),
    (245, 158, 11),
    (139, 92, 246),
];

/// Point on a sphere from inclination `phi` (from +Y) and azimuth `theta`
/// (around Y, measured from +Z)
pub fn from_spherical(radius: f32, phi: f32, theta: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

/// A traffic endpoint on the globe surface
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Node {
    pub position: Vec3,
}

/// Animated curved path between two nodes
#[derive(Clone, Debug, Serialize)]
pub struct Arc {
    pub start: Vec3,
    pub end: Vec3,
    pub color: (u8, u8, u8),
    pub curve: Curve,
    pub progress: Progress,
}

impl Arc {
    pub fn color(&self) -> Color {
        let (r, g, b) = self.color;
        Color::Rgb { r, g, b }
    }
}

/// Sample exactly `count` nodes at random angular positions
pub fn sample_nodes<R: Rng>(rng: &mut R, count: usize, radius: f32) -> Vec<Node> {
    (0..count)
        .map(|_| {
            let phi = (rng.gen::<f32>() * NODE_PHI_SPAN + NODE_PHI_MIN) * PI;
            let theta = rng.gen::<f32>() * TAU;
            Node { position: from_spherical(radius + NODE_LIFT, phi, theta) }
        })
        .collect()
}

/// Sample up to `config.arc_count` arcs between random node pairs.
///
/// Pairs are drawn with replacement and kept only when their endpoints are
/// farther apart than `config.min_arc_distance`. At most
/// `arc_count * attempt_factor` candidates are tried, so an unsatisfiable
/// threshold yields fewer arcs instead of looping forever.
pub fn sample_arcs<R: Rng>(rng: &mut R, nodes: &[Node], config: &GlobeConfig) -> Vec<Arc> {
    let mut arcs = Vec::with_capacity(config.arc_count);
    if nodes.is_empty() || config.arc_count == 0 {
        return arcs;
    }

    let max_attempts = config.arc_count.saturating_mul(config.attempt_factor.max(1));
    let mut attempts = 0;
    while arcs.len() < config.arc_count && attempts < max_attempts {
        attempts += 1;
        let start = nodes[rng.gen_range(0..nodes.len())].position;
        let end = nodes[rng.gen_range(0..nodes.len())].position;
        if start.distance(end) <= config.min_arc_distance {
            continue;
        }
        arcs.push(Arc {
            start,
            end,
            color: ARC_PALETTE[arcs.len() % ARC_PALETTE.len()],
            curve: build_arc(start, end, config.radius, config.bow),
            progress: Progress::new(rng.gen()),
        });
    }

    if arcs.len() < config.arc_count {
        debug!(
            requested = config.arc_count,
            kept = arcs.len(),
            attempts,
            "arc sampling stopped at attempt limit"
        );
    }
    arcs
}

/// Everything that animates on the globe
#[derive(Clone, Debug, Serialize)]
pub struct Scene {
    pub radius: f32,
    pub nodes: Vec<Node>,
    pub arcs: Vec<Arc>,
    /// Accumulated globe rotation about Y (radians)
    pub spin: f32,
}

impl Scene {
    pub fn generate<R: Rng>(config: &GlobeConfig, rng: &mut R) -> Self {
        let nodes = sample_nodes(rng, config.node_count, config.radius);
        let arcs = sample_arcs(rng, &nodes, config);
        debug!(nodes = nodes.len(), arcs = arcs.len(), "scene generated");
        Self {
            radius: config.radius,
            nodes,
            arcs,
            spin: 0.0,
        }
    }

    /// One frame of animation: every arc's progress and the globe spin
    pub fn advance(&mut self, params: &MotionParams, spin_step: f32) {
        for arc in &mut self.arcs {
            arc.progress.advance(params.step);
        }
        self.spin = (self.spin + spin_step).rem_euclid(TAU);
    }

    /// Marker transforms for every arc at the given clock time
    pub fn frames(&self, clock_secs: f32, params: &MotionParams) -> Vec<ArcFrame> {
        self.arcs
            .iter()
            .map(|arc| motion::render(&arc.curve, arc.progress, clock_secs, params))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn spherical_axes() {
        let north = from_spherical(2.0, 0.0, 0.0);
        assert_relative_eq!(north.y, 2.0, epsilon = 1e-6);
        let front = from_spherical(2.0, PI / 2.0, 0.0);
        assert_relative_eq!(front.z, 2.0, epsilon = 1e-6);
        let side = from_spherical(2.0, PI / 2.0, PI / 2.0);
        assert_relative_eq!(side.x, 2.0, epsilon = 1e-6);
    }

    #[test]
    fn requested_node_count_is_exact() {
        let mut rng = rng();
        for k in [0, 1, 12, 40] {
            let nodes = sample_nodes(&mut rng, k, 2.0);
            assert_eq!(nodes.len(), k);
            for n in &nodes {
                assert_relative_eq!(n.position.length(), 2.01, epsilon = 1e-4);
            }
        }
    }

    #[test]
    fn nodes_stay_in_inclination_band() {
        let nodes = sample_nodes(&mut rng(), 200, 2.0);
        for n in &nodes {
            let phi = (n.position.y / n.position.length()).acos() / PI;
            assert!(phi >= NODE_PHI_MIN - 1e-4 && phi <= NODE_PHI_MIN + NODE_PHI_SPAN + 1e-4);
        }
    }

    #[test]
    fn arcs_respect_threshold_and_count() {
        let config = GlobeConfig::default();
        let mut rng = rng();
        let nodes = sample_nodes(&mut rng, config.node_count, config.radius);
        let arcs = sample_arcs(&mut rng, &nodes, &config);
        assert!(arcs.len() <= config.arc_count);
        for arc in &arcs {
            assert!(arc.start.distance(arc.end) > config.min_arc_distance);
            assert!((0.0..1.0).contains(&arc.progress.value()));
        }
    }

    #[test]
    fn unsatisfiable_threshold_returns_no_arcs() {
        let config = GlobeConfig { min_arc_distance: 100.0, ..GlobeConfig::default() };
        let mut rng = rng();
        let nodes = sample_nodes(&mut rng, 12, config.radius);
        assert!(sample_arcs(&mut rng, &nodes, &config).is_empty());
    }

    #[test]
    fn no_nodes_means_no_arcs() {
        let config = GlobeConfig::default();
        assert!(sample_arcs(&mut rng(), &[], &config).is_empty());
    }

    #[test]
    fn single_node_cannot_form_an_arc() {
        let config = GlobeConfig::default();
        let mut rng = rng();
        let nodes = sample_nodes(&mut rng, 1, config.radius);
        assert!(sample_arcs(&mut rng, &nodes, &config).is_empty());
    }

    #[test]
    fn arc_colors_cycle_palette() {
        let config = GlobeConfig { min_arc_distance: 0.0, node_count: 30, ..GlobeConfig::default() };
        let mut rng = rng();
        let nodes = sample_nodes(&mut rng, config.node_count, config.radius);
        let arcs = sample_arcs(&mut rng, &nodes, &config);
        for (i, arc) in arcs.iter().enumerate() {
            assert_eq!(arc.color, ARC_PALETTE[i % ARC_PALETTE.len()]);
        }
    }

    #[test]
    fn seeded_generation_is_deterministic() {
        let config = GlobeConfig::default();
        let a = Scene::generate(&config, &mut StdRng::seed_from_u64(7));
        let b = Scene::generate(&config, &mut StdRng::seed_from_u64(7));
        assert_eq!(a.nodes, b.nodes);
        assert_eq!(a.arcs.len(), b.arcs.len());
        for (x, y) in a.arcs.iter().zip(&b.arcs) {
            assert_eq!(x.start, y.start);
            assert_eq!(x.progress, y.progress);
        }
    }

    #[test]
    fn advance_moves_every_arc_and_the_spin() {
        let config = GlobeConfig::default();
        let mut scene = Scene::generate(&config, &mut rng());
        let before: Vec<f32> = scene.arcs.iter().map(|a| a.progress.value()).collect();
        let params = MotionParams::default();
        scene.advance(&params, 0.0004);
        for (arc, b) in scene.arcs.iter().zip(before) {
            let expected = (b + params.step).rem_euclid(1.0);
            assert_relative_eq!(arc.progress.value(), expected, epsilon = 1e-6);
        }
        assert_relative_eq!(scene.spin, 0.0004, epsilon = 1e-7);
        assert_eq!(scene.frames(0.0, &params).len(), scene.arcs.len());
    }
}
