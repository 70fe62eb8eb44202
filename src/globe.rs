//! Braille globe: earth surface, attack arcs and HUD rings

use crate::braille::BrailleCanvas;
use crate::colors::{scheme_color, shade, ColorState, GLOBE_FALLBACK, NODE};
use crate::continents::CONTINENTS;
use crate::layout::Rect;
use crate::scene::motion::{node_pulse, ArcFrame};
use crate::scene::Scene;
use crate::terminal::{rgb, Terminal};
use crate::texture::{geo_to_vec, is_land, luminance, EarthTextures};
use crossterm::style::Color;
use glam::{Mat3, Vec3};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI, TAU};

// Draw layers, lowest first
const LAYER_STAR: u8 = 1;
const LAYER_RING: u8 = 2;
const LAYER_GRID: u8 = 3;
const LAYER_SURFACE: u8 = 4;
const LAYER_ARC: u8 = 5;
const LAYER_NODE: u8 = 6;
const LAYER_TAIL: u8 = 7;
const LAYER_HEAD: u8 = 8;

/// Scene units visible from the center to the nearest pane edge at zoom 1
const VIEW_EXTENT: f32 = 3.6;
const ZOOM_MIN: f32 = 0.3;
const ZOOM_MAX: f32 = 3.0;
const RIBBON_SEGMENTS: usize = 64;
const STAR_COUNT: usize = 90;

/// Decorative rings: (radius, rotation about X, rotation about Y)
const RINGS: [(f32, f32, f32); 2] = [(3.0, PI / 3.0, 0.0), (3.5, -PI / 4.0, PI / 6.0)];

/// Camera state the user can steer
#[derive(Clone, Debug)]
pub struct GlobeView {
    pub tilt: f32,
    pub zoom: f32,
    /// Manual rotation added on top of the scene spin
    pub yaw_offset: f32,
    default_tilt: f32,
}

impl GlobeView {
    pub fn new(tilt: f32) -> Self {
        Self {
            tilt,
            zoom: 1.0,
            yaw_offset: 0.0,
            default_tilt: tilt,
        }
    }

    pub fn tilt_by(&mut self, delta: f32) {
        self.tilt = (self.tilt + delta).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    pub fn yaw_by(&mut self, delta: f32) {
        self.yaw_offset = (self.yaw_offset + delta).rem_euclid(TAU);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.2).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.2).max(ZOOM_MIN);
    }

    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.yaw_offset = 0.0;
        self.tilt = self.default_tilt;
    }
}

/// Orthographic projection from scene space to dot space
#[derive(Clone, Copy, Debug)]
pub struct Projector {
    center: (f32, f32),
    scale: f32,
    radius: f32,
    /// Globe group (spinning) and fixed HUD rotations
    globe: Mat3,
    fixed: Mat3,
}

impl Projector {
    pub fn new(dot_w: usize, dot_h: usize, radius: f32, spin: f32, view: &GlobeView) -> Self {
        let half = (dot_w.min(dot_h) as f32) / 2.0;
        let fixed = Mat3::from_rotation_x(view.tilt);
        Self {
            center: (dot_w as f32 / 2.0, dot_h as f32 / 2.0),
            scale: half / VIEW_EXTENT * view.zoom,
            radius,
            globe: fixed * Mat3::from_rotation_y(spin + view.yaw_offset),
            fixed,
        }
    }

    /// Globe disk radius in dots
    pub fn disk_radius(&self) -> f32 {
        self.radius * self.scale
    }

    /// Camera-space position of a point on the spinning globe
    pub fn to_camera(&self, p: Vec3) -> Vec3 {
        self.globe * p
    }

    /// Project a point of the spinning globe group; None when hidden behind it
    pub fn project(&self, p: Vec3) -> Option<(i32, i32)> {
        self.project_camera(self.globe * p)
    }

    /// Project a point attached to the fixed (non-spinning) frame
    pub fn project_fixed(&self, p: Vec3) -> Option<(i32, i32)> {
        self.project_camera(self.fixed * p)
    }

    fn project_camera(&self, c: Vec3) -> Option<(i32, i32)> {
        let behind = c.z < 0.0 && c.x * c.x + c.y * c.y < self.radius * self.radius;
        if behind {
            return None;
        }
        let x = self.center.0 + c.x * self.scale;
        let y = self.center.1 - c.y * self.scale;
        Some((x.round() as i32, y.round() as i32))
    }

    /// Globe-space surface point under a dot, if the dot lies on the disk
    pub fn unproject_surface(&self, dx: i32, dy: i32) -> Option<Vec3> {
        let x = (dx as f32 + 0.5 - self.center.0) / self.scale;
        let y = (self.center.1 - dy as f32 - 0.5) / self.scale;
        let r2 = self.radius * self.radius;
        let d2 = x * x + y * y;
        if d2 > r2 {
            return None;
        }
        let z = (r2 - d2).sqrt();
        Some(self.globe.transpose() * Vec3::new(x, y, z))
    }
}

/// Sun direction: longitude where it is noon at `utc_hours`, equator
pub fn sun_direction(utc_hours: f32) -> Vec3 {
    let lon = (12.0 - utc_hours) / 24.0 * 360.0;
    let lon = (lon + 180.0).rem_euclid(360.0) - 180.0;
    geo_to_vec(0.0, lon, 1.0)
}

/// Clock readings the globe needs for one frame
#[derive(Clone, Copy, Debug)]
pub struct GlobeClock {
    /// Animation time in seconds since start
    pub secs: f32,
    /// Hours since UTC midnight, for the day/night terminator
    pub utc_hours: f32,
}

/// Globe pane renderer with its reusable dot buffer and star field
pub struct GlobeRenderer {
    canvas: BrailleCanvas,
    size: (u16, u16),
    stars: Vec<(f32, f32, bool)>,
}

impl GlobeRenderer {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| (rng.gen::<f32>(), rng.gen::<f32>(), rng.gen_bool(0.2)))
            .collect();
        Self {
            canvas: BrailleCanvas::new(0, 0),
            size: (0, 0),
            stars,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        term: &mut Terminal,
        rect: Rect,
        scene: &Scene,
        frames: &[ArcFrame],
        view: &GlobeView,
        textures: &EarthTextures,
        clock: GlobeClock,
        colors: &ColorState,
    ) {
        if rect.is_empty() {
            return;
        }
        if self.size != (rect.width, rect.height) {
            self.canvas = BrailleCanvas::new(rect.width, rect.height);
            self.size = (rect.width, rect.height);
        }
        self.canvas.clear();

        let (dot_w, dot_h) = self.canvas.dot_size();
        let proj = Projector::new(dot_w, dot_h, scene.radius, scene.spin, view);

        self.draw_stars(dot_w, dot_h, clock.secs, colors);
        draw_rings(&mut self.canvas, &proj, colors);
        draw_graticule(&mut self.canvas, &proj, scene.radius, colors);
        if textures.is_empty() {
            draw_fallback(&mut self.canvas, &proj, scene.radius);
        } else {
            draw_surface(&mut self.canvas, &proj, textures, sun_direction(clock.utc_hours), colors);
        }
        draw_arcs(&mut self.canvas, &proj, scene, frames, clock.secs);

        self.canvas.blit(term, rect.x, rect.y);
    }

    fn draw_stars(&mut self, dot_w: usize, dot_h: usize, secs: f32, colors: &ColorState) {
        let (dim, _) = scheme_color(colors.scheme, 0, false);
        for (i, &(sx, sy, twinkles)) in self.stars.iter().enumerate() {
            if twinkles && ((secs * 1.2 + i as f32).sin() < -0.3) {
                continue;
            }
            let x = (sx * dot_w as f32) as i32;
            let y = (sy * dot_h as f32) as i32;
            self.canvas.plot(x, y, LAYER_STAR, dim, false);
        }
    }
}

fn draw_rings(canvas: &mut BrailleCanvas, proj: &Projector, colors: &ColorState) {
    let (color, _) = scheme_color(colors.scheme, 0, false);
    for &(radius, rx, ry) in &RINGS {
        let rot = Mat3::from_rotation_x(rx) * Mat3::from_rotation_y(ry);
        let steps = 240;
        for i in 0..steps {
            // Dashed: skip every third sample
            if i % 3 == 0 {
                continue;
            }
            let a = i as f32 / steps as f32 * TAU;
            let p = rot * Vec3::new(radius * a.cos(), radius * a.sin(), 0.0);
            if let Some((x, y)) = proj.project_fixed(p) {
                canvas.plot(x, y, LAYER_RING, color, false);
            }
        }
    }
}

fn draw_graticule(canvas: &mut BrailleCanvas, proj: &Projector, radius: f32, colors: &ColorState) {
    let (color, _) = scheme_color(colors.scheme, 0, false);
    let r = radius * 1.0025;
    let mut plot = |lat: f32, lon: f32| {
        let p = geo_to_vec(lat, lon, r);
        if proj.to_camera(p).z >= 0.0 {
            if let Some((x, y)) = proj.project(p) {
                canvas.plot(x, y, LAYER_GRID, color, false);
            }
        }
    };
    for lat in (-60..=60).step_by(30) {
        for lon in (-180..180).step_by(2) {
            plot(lat as f32, lon as f32);
        }
    }
    for lon in (-180..180).step_by(30) {
        for lat in (-88..=88).step_by(2) {
            plot(lat as f32, lon as f32);
        }
    }
}

/// No texture: limb circle and coastline outlines in the flat fallback color
fn draw_fallback(canvas: &mut BrailleCanvas, proj: &Projector, radius: f32) {
    let (dot_w, dot_h) = canvas.dot_size();
    let cx = dot_w as f32 / 2.0;
    let cy = dot_h as f32 / 2.0;
    let r = proj.disk_radius();
    let steps = (r * TAU).max(16.0) as usize;
    for i in 0..steps {
        let a = i as f32 / steps as f32 * TAU;
        let x = (cx + r * a.cos()).round() as i32;
        let y = (cy + r * a.sin()).round() as i32;
        canvas.plot(x, y, LAYER_SURFACE, GLOBE_FALLBACK, false);
    }

    for ring in CONTINENTS {
        for pair in ring.windows(2) {
            let (lat1, lon1) = pair[0];
            let (lat2, lon2) = pair[1];
            for t in 0..20 {
                let frac = t as f32 / 20.0;
                let lat = lat1 + (lat2 - lat1) * frac;
                let lon = lon1 + (lon2 - lon1) * frac;
                let p = geo_to_vec(lat, lon, radius);
                if proj.to_camera(p).z < 0.0 {
                    continue;
                }
                if let Some((x, y)) = proj.project(p) {
                    canvas.plot(x, y, LAYER_SURFACE, GLOBE_FALLBACK, true);
                }
            }
        }
    }
}

/// Texture-shaded disk: land on the day side, city lights on the night side
fn draw_surface(canvas: &mut BrailleCanvas, proj: &Projector, textures: &EarthTextures, sun: Vec3, colors: &ColorState) {
    let (dot_w, dot_h) = canvas.dot_size();
    let r = proj.disk_radius().ceil() as i32;
    let cx = dot_w as i32 / 2;
    let cy = dot_h as i32 / 2;
    let (land_day, _) = scheme_color(colors.scheme, 1, false);
    let (land_dusk, _) = scheme_color(colors.scheme, 0, false);
    let lights = rgb(255, 214, 140);

    for dy in (cy - r).max(0)..(cy + r).min(dot_h as i32) {
        for dx in (cx - r).max(0)..(cx + r).min(dot_w as i32) {
            let Some(p) = proj.unproject_surface(dx, dy) else {
                continue;
            };
            let daylight = p.normalize_or_zero().dot(sun);

            if daylight < -0.05 {
                if let Some(night) = &textures.night {
                    if luminance(night.sample(p)) > 70 {
                        canvas.plot(dx, dy, LAYER_SURFACE, lights, false);
                        continue;
                    }
                }
            }

            if let Some(day) = &textures.day {
                if is_land(day.sample(p)) {
                    let color = if daylight > 0.1 { land_day } else { land_dusk };
                    canvas.plot(dx, dy, LAYER_SURFACE, color, false);
                }
            }
        }
    }
}

fn draw_arcs(canvas: &mut BrailleCanvas, proj: &Projector, scene: &Scene, frames: &[ArcFrame], secs: f32) {
    for arc in &scene.arcs {
        let ribbon = shade(arc.color(), 0.6);
        let points = arc.curve.sample(RIBBON_SEGMENTS);
        for pair in points.windows(2) {
            if let (Some(a), Some(b)) = (proj.project(pair[0]), proj.project(pair[1])) {
                canvas.line(a.0, a.1, b.0, b.1, LAYER_ARC, ribbon, false);
            }
        }
    }

    let node_r = (node_pulse(secs) - 0.5).round() as i32;
    for node in &scene.nodes {
        if let Some((x, y)) = proj.project(node.position) {
            canvas.plot_square(x, y, node_r, LAYER_NODE, NODE, false);
        }
    }

    for (arc, frame) in scene.arcs.iter().zip(frames) {
        if let Some((x, y)) = proj.project(frame.tail.position) {
            canvas.plot(x, y, LAYER_TAIL, arc.color(), true);
        }

        let head = frame.head;
        let Some((hx, hy)) = proj.project(head.position) else {
            continue;
        };
        let size = if head.scale > 1.1 { 1 } else { 0 };
        canvas.plot_square(hx, hy, size, LAYER_HEAD, Color::White, true);
        // Orientation streak toward the faced point
        let nose = head.position + head.direction() * 0.12;
        if let Some((nx, ny)) = proj.project(nose) {
            canvas.line(hx, hy, nx, ny, LAYER_HEAD, Color::White, true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GlobeConfig;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flat_view() -> GlobeView {
        GlobeView::new(0.0)
    }

    #[test]
    fn front_point_projects_to_center() {
        let proj = Projector::new(200, 160, 2.0, 0.0, &flat_view());
        assert_eq!(proj.project(Vec3::new(0.0, 0.0, 2.0)), Some((100, 80)));
    }

    #[test]
    fn back_of_globe_is_hidden() {
        let proj = Projector::new(200, 160, 2.0, 0.0, &flat_view());
        assert_eq!(proj.project(Vec3::new(0.0, 0.0, -2.0)), None);
        // Behind but outside the disk silhouette stays visible
        assert!(proj.project(Vec3::new(0.0, 3.0, -1.0)).is_some());
    }

    #[test]
    fn spin_rotates_the_globe_group_only() {
        let proj = Projector::new(200, 160, 2.0, PI, &flat_view());
        assert_eq!(proj.project(Vec3::new(0.0, 0.0, 2.0)), None);
        assert_eq!(proj.project_fixed(Vec3::new(0.0, 0.0, 2.0)), Some((100, 80)));
    }

    #[test]
    fn unproject_inverts_project() {
        let view = GlobeView::new(0.3);
        let proj = Projector::new(200, 160, 2.0, 1.1, &view);
        let p = proj.unproject_surface(110, 70).unwrap();
        assert_relative_eq!(p.length(), 2.0, epsilon = 1e-4);
        let (x, y) = proj.project(p).unwrap();
        assert!((x - 110).abs() <= 1 && (y - 70).abs() <= 1);
        assert!(proj.unproject_surface(0, 0).is_none());
    }

    #[test]
    fn view_controls_clamp() {
        let mut view = GlobeView::new(0.2);
        for _ in 0..50 {
            view.zoom_in();
            view.tilt_by(0.1);
        }
        assert_relative_eq!(view.zoom, ZOOM_MAX);
        assert_relative_eq!(view.tilt, FRAC_PI_2);
        for _ in 0..50 {
            view.zoom_out();
        }
        assert_relative_eq!(view.zoom, ZOOM_MIN);
        view.reset();
        assert_relative_eq!(view.tilt, 0.2);
        assert_relative_eq!(view.zoom, 1.0);
    }

    #[test]
    fn sun_is_over_greenwich_at_noon_utc() {
        let sun = sun_direction(12.0);
        let greenwich = geo_to_vec(0.0, 0.0, 1.0);
        assert_relative_eq!(sun.dot(greenwich), 1.0, epsilon = 1e-5);
        let midnight = sun_direction(0.0);
        assert_relative_eq!(midnight.dot(greenwich), -1.0, epsilon = 1e-5);
    }

    #[test]
    fn fallback_globe_renders_without_textures() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = GlobeConfig::default();
        let scene = Scene::generate(&config, &mut rng);
        let frames = scene.frames(0.0, &config.motion);
        let mut renderer = GlobeRenderer::new(&mut rng);
        let mut term = Terminal::offscreen(60, 30);
        let view = GlobeView::new(config.tilt);
        let clock = GlobeClock { secs: 0.0, utc_hours: 12.0 };
        renderer.render(
            &mut term,
            Rect::new(0, 0, 60, 30),
            &scene,
            &frames,
            &view,
            &EarthTextures::default(),
            clock,
            &ColorState::new(0),
        );
        let lit = (0..30).filter_map(|y| {
            let row = term.row_text(y);
            (!row.is_empty()).then_some(row)
        });
        assert!(lit.count() > 10);
        // Fallback color appears somewhere on the limb
        let has_fallback = (0..60u16).any(|x| {
            (0..30u16).any(|y| term.cell(x, y).and_then(|c| c.fg) == Some(GLOBE_FALLBACK))
        });
        assert!(has_fallback);
    }
}
