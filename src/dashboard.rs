//! Full-screen situation dashboard: panels around the spinning globe

use crate::clock::{now_timestamp, utc_hours, Ticker};
use crate::colors::{status_to_scheme, ColorState, StatusColor};
use crate::config::{DashboardConfig, GlobeConfig, TimeRange, ViewMode};
use crate::globe::{GlobeClock, GlobeRenderer, GlobeView};
use crate::help::render_help_overlay;
use crate::layout::{Panel, Rect};
use crate::mock;
use crate::panels;
use crate::scene::motion::ArcFrame;
use crate::scene::Scene;
use crate::terminal::Terminal;
use crate::texture::{load_texture, EarthTexture, EarthTextures, TextureKind, TextureLoader};
use chrono::Utc;
use crossterm::event::{KeyCode, KeyModifiers};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::io;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Panels need at least this many columns; below it the globe fills the screen
pub const MIN_DASHBOARD_WIDTH: u16 = 90;
const MIN_DASHBOARD_HEIGHT: u16 = 24;

const LEFT_WIDTH: u16 = 34;
const RIGHT_WIDTH: u16 = 36;
const HEADER_HEIGHT: u16 = 3;

const HELP: &str = "\
q / Esc      quit
Space        pause
d / w / m    trend range: day / week / month
Tab          next trend range
Up/Dn, j/k   tilt globe
Lt/Rt, h/l   turn globe
+ / -        zoom
0            reset view
r            new attack scene
1-9          frame delay
Shift+0-7    color scheme
?            toggle this help";

/// Everything the panels read when drawing a frame
#[derive(Clone, Debug)]
pub struct ViewState {
    pub range: TimeRange,
    pub timestamp: String,
    pub paused: bool,
    pub colors: ColorState,
    pub show_help: bool,
}

impl ViewState {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            timestamp: now_timestamp(),
            paused: false,
            colors: ColorState::new(0),
            show_help: false,
        }
    }
}

/// Key-driven state of a running dashboard
pub struct DashboardState {
    pub view: ViewState,
    pub globe: GlobeView,
    /// Seconds per frame
    pub time_step: f32,
    /// Set by `r`; the loop rebuilds the scene and clears it
    pub regenerate: bool,
}

impl DashboardState {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            view: ViewState::new(config.range),
            globe: GlobeView::new(config.globe.tilt),
            time_step: config.time_step,
            regenerate: false,
        }
    }

    /// Handle keypress, returns true if should quit
    pub fn handle_key(&mut self, code: KeyCode, _modifiers: KeyModifiers) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char(' ') => self.view.paused = !self.view.paused,
            KeyCode::Char('?') => self.view.show_help = !self.view.show_help,
            KeyCode::Char('d') => self.view.range = TimeRange::Day,
            KeyCode::Char('w') => self.view.range = TimeRange::Week,
            KeyCode::Char('m') => self.view.range = TimeRange::Month,
            KeyCode::Tab => self.view.range = self.view.range.next(),
            KeyCode::Up | KeyCode::Char('k') => self.globe.tilt_by(0.05),
            KeyCode::Down | KeyCode::Char('j') => self.globe.tilt_by(-0.05),
            KeyCode::Left | KeyCode::Char('h') => self.globe.yaw_by(-0.1),
            KeyCode::Right | KeyCode::Char('l') => self.globe.yaw_by(0.1),
            KeyCode::Char('+') | KeyCode::Char('=') => self.globe.zoom_in(),
            KeyCode::Char('-') | KeyCode::Char('_') => self.globe.zoom_out(),
            KeyCode::Char('0') => self.globe.reset(),
            KeyCode::Char('r') => self.regenerate = true,
            // Number keys: frame delay (1=fastest, 9=slowest)
            KeyCode::Char(c @ '1'..='9') => {
                self.time_step = match c {
                    '1' => 0.005,
                    '2' => 0.01,
                    '3' => 0.02,
                    '4' => 0.03,
                    '5' => 0.05,
                    '6' => 0.07,
                    '7' => 0.1,
                    '8' => 0.15,
                    _ => 0.2,
                };
            }
            other => {
                self.view.colors.handle_key(other);
            }
        }
        false
    }
}

/// Screen regions of one frame; empty rects are not drawn
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DashboardLayout {
    pub header: Rect,
    pub left: Rect,
    pub right: Rect,
    pub metrics: Rect,
    pub globe: Rect,
    pub tickers: Rect,
    pub footer: Rect,
}

pub fn compute_layout(width: u16, height: u16, mode: ViewMode) -> DashboardLayout {
    let footer = Rect::new(0, height.saturating_sub(1) as i32, width, height.min(1));
    let globe_only = mode == ViewMode::GlobeOnly || width < MIN_DASHBOARD_WIDTH || height < MIN_DASHBOARD_HEIGHT;
    if globe_only {
        return DashboardLayout {
            globe: Rect::new(0, 0, width, height.saturating_sub(1)),
            footer,
            ..DashboardLayout::default()
        };
    }

    let body_y = HEADER_HEIGHT as i32;
    let body_h = height - HEADER_HEIGHT - 1;
    let center_w = width - LEFT_WIDTH - RIGHT_WIDTH;
    let center = Rect::new(LEFT_WIDTH as i32, body_y, center_w, body_h);
    let metrics_h = if center_w as usize / mock::TOP_METRICS.len() >= 14 { 2 } else { 4 };
    let parts = center.split_rows(&[metrics_h, body_h - metrics_h - 2, 2]);

    DashboardLayout {
        header: Rect::new(0, 0, width, HEADER_HEIGHT),
        left: Rect::new(0, body_y, LEFT_WIDTH, body_h),
        right: Rect::new((width - RIGHT_WIDTH) as i32, body_y, RIGHT_WIDTH, body_h),
        metrics: parts[0].inset_x(1),
        globe: parts[1],
        tickers: parts[2].inset_x(1),
        footer,
    }
}

/// Per-frame globe inputs
pub struct GlobeFrame<'a> {
    pub scene: &'a Scene,
    pub arcs: &'a [ArcFrame],
    pub view: &'a GlobeView,
    pub textures: &'a EarthTextures,
    pub clock: GlobeClock,
}

/// Draw one complete frame into the back buffer
pub fn render_dashboard(
    term: &mut Terminal,
    view: &ViewState,
    mode: ViewMode,
    renderer: &mut GlobeRenderer,
    globe: &GlobeFrame,
) {
    let (width, height) = term.size();
    let layout = compute_layout(width, height, mode);
    let colors = &view.colors;

    panels::header(
        term,
        layout.header,
        mock::TITLE,
        mock::BADGE,
        (&mock::NAV_LEFT, &mock::NAV_RIGHT),
        colors,
    );
    if !layout.left.is_empty() {
        render_left(term, layout.left, view);
    }
    if !layout.right.is_empty() {
        render_right(term, layout.right, colors);
    }
    panels::top_metrics(term, layout.metrics, &mock::TOP_METRICS, colors);
    renderer.render(
        term,
        layout.globe,
        globe.scene,
        globe.arcs,
        globe.view,
        globe.textures,
        globe.clock,
        colors,
    );
    panels::tickers(term, layout.tickers, &mock::KILL_CHAIN, colors);

    let status = view.paused.then_some("PAUSED");
    panels::footer(term, layout.footer, mock::OS_VERSION, &view.timestamp, status, colors);

    if view.show_help {
        render_help_overlay(term, width, height, "HELP", HELP);
    }
}

fn render_left(term: &mut Terminal, rect: Rect, view: &ViewState) {
    let colors = &view.colors;
    let available = rect.height.saturating_sub(9);
    let prediction_h = (available * 2 / 5).max(6);
    let parts = rect.split_rows(&[9, available.saturating_sub(prediction_h), prediction_h]);

    let handling = Panel::new(parts[0], "ALERT HANDLING");
    handling.draw(term);
    let inner = handling.inner();
    let value_color = status_to_scheme(colors.scheme, StatusColor::Info);
    panels::stat_grid(term, Rect::new(inner.x, inner.y, inner.width, 2), &mock::ALERT_STATS, value_color, colors);
    panels::section_title(term, Rect::new(inner.x, inner.y + 2, inner.width, 1), "HANDLING STATUS", colors);
    let rows = Rect::new(inner.x, inner.y + 3, inner.width, inner.height.saturating_sub(3));
    panels::status_rows(term, rows, &mock::STATUS_ROWS, colors);

    let trend = Panel::new(parts[1], "ALERT TREND");
    trend.draw(term);
    panels::range_selector(term, parts[1].right() - 2, parts[1].y, view.range, colors);
    panels::area_chart(term, trend.inner(), mock::trend(view.range), colors);

    let prediction = Panel::new(parts[2], "ATTACK PREDICTION");
    prediction.draw(term);
    panels::bar_chart(term, prediction.inner(), &mock::PREDICTIONS, mock::PREDICTION_MAX, colors);
}

fn render_right(term: &mut Terminal, rect: Rect, colors: &ColorState) {
    let zones_h = rect.height.saturating_sub(7 + 4).min(12);
    let parts = rect.split_rows(&[7, zones_h, 0]);

    let assets = Panel::new(parts[0], "ATTACKED ASSETS TOP5");
    assets.draw(term);
    panels::asset_list(term, assets.inner(), &mock::ASSETS, mock::ASSET_HOT_RANKS, colors);

    let zones = Panel::new(parts[1], "SECURITY ZONES");
    zones.draw(term);
    panels::zone_meters(term, zones.inner(), &mock::ZONES, colors);

    let vulns = Panel::new(parts[2], "VULNERABILITIES");
    vulns.draw(term);
    let inner = vulns.inner();
    let value_color = status_to_scheme(colors.scheme, StatusColor::Critical);
    panels::stat_grid(term, Rect::new(inner.x, inner.y, inner.width, 2), &mock::VULN_STATS, value_color, colors);
}

/// Seeded RNG; the wall clock picks a seed when none is given
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    let seed = seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    });
    debug!(seed, "rng seeded");
    StdRng::seed_from_u64(seed)
}

fn request_textures(loader: &mut TextureLoader, globe: &GlobeConfig) {
    if let Some(url) = &globe.day_texture {
        loader.request(TextureKind::Day, url);
    }
    if let Some(url) = &globe.night_texture {
        loader.request(TextureKind::Night, url);
    }
}

fn globe_clock(secs: f32) -> GlobeClock {
    GlobeClock {
        secs,
        utc_hours: utc_hours(&Utc::now()),
    }
}

/// Run the interactive dashboard until the user quits
pub fn run(config: DashboardConfig) -> io::Result<()> {
    let mut rng = seeded_rng(config.seed);
    let mut term = Terminal::new(true)?;
    term.clear_screen()?;

    let mut loader = TextureLoader::new();
    if config.offline {
        info!("offline: textures disabled");
    } else {
        request_textures(&mut loader, &config.globe);
    }

    let mut scene = Scene::generate(&config.globe, &mut rng);
    let mut renderer = GlobeRenderer::new(&mut rng);
    let mut state = DashboardState::new(&config);
    let mut ticker = Ticker::new(Instant::now());
    let mut anim_secs = 0.0f32;

    let (mut prev_w, mut prev_h) = term.size();
    info!(width = prev_w, height = prev_h, mode = ?config.mode, "dashboard started");

    loop {
        let (width, height) = crossterm::terminal::size().unwrap_or(term.size());
        if width != prev_w || height != prev_h {
            term.resize(width, height);
            term.clear_screen()?;
            prev_w = width;
            prev_h = height;
            debug!(width, height, "terminal resized");
        }

        if let Some((code, mods)) = term.check_key()? {
            if state.handle_key(code, mods) {
                break;
            }
        }

        if state.regenerate {
            state.regenerate = false;
            scene = Scene::generate(&config.globe, &mut rng);
        }

        if loader.poll() {
            debug!("texture set updated");
        }

        if !state.view.paused {
            scene.advance(&config.globe.motion, config.globe.spin);
            anim_secs += state.time_step;
        }
        if ticker.poll(Instant::now()) {
            state.view.timestamp = now_timestamp();
        }

        let arcs = scene.frames(anim_secs, &config.globe.motion);
        let frame = GlobeFrame {
            scene: &scene,
            arcs: &arcs,
            view: &state.globe,
            textures: loader.textures(),
            clock: globe_clock(anim_secs),
        };

        term.clear();
        render_dashboard(&mut term, &state.view, config.mode, &mut renderer, &frame);
        term.present()?;
        term.sleep(state.time_step);
    }

    info!("dashboard stopped");
    Ok(())
}

/// Load textures on the calling thread; failures leave the flat globe
fn load_textures_blocking(globe: &GlobeConfig) -> EarthTextures {
    let load = |kind: TextureKind, url: &Option<String>| {
        let url = url.as_deref()?;
        match load_texture(url) {
            Ok(image) => Some(EarthTexture::from_image(&image)),
            Err(e) => {
                warn!(?kind, error = %e, "texture unavailable, using flat globe");
                None
            }
        }
    };
    EarthTextures {
        day: load(TextureKind::Day, &globe.day_texture),
        night: load(TextureKind::Night, &globe.night_texture),
    }
}

/// Render the dashboard after `frames` steps into an offscreen buffer
pub fn render_frame_offscreen(config: &DashboardConfig, width: u16, height: u16, frames: usize) -> Terminal {
    let mut rng = seeded_rng(config.seed);
    let mut scene = Scene::generate(&config.globe, &mut rng);
    let mut renderer = GlobeRenderer::new(&mut rng);
    for _ in 0..frames {
        scene.advance(&config.globe.motion, config.globe.spin);
    }

    let textures = if config.offline {
        EarthTextures::default()
    } else {
        load_textures_blocking(&config.globe)
    };
    let secs = frames as f32 * config.time_step;
    let arcs = scene.frames(secs, &config.globe.motion);
    let globe_view = GlobeView::new(config.globe.tilt);
    let frame = GlobeFrame {
        scene: &scene,
        arcs: &arcs,
        view: &globe_view,
        textures: &textures,
        clock: globe_clock(secs),
    };

    let mut term = Terminal::offscreen(width, height);
    render_dashboard(&mut term, &ViewState::new(config.range), config.mode, &mut renderer, &frame);
    term
}

#[derive(Serialize)]
struct SceneDump<'a> {
    seed: Option<u64>,
    frames: usize,
    scene: &'a Scene,
    markers: Vec<ArcFrame>,
}

/// Generated scene after `frames` steps, as pretty JSON
pub fn dump_scene(config: &DashboardConfig, frames: usize) -> serde_json::Result<String> {
    let mut rng = seeded_rng(config.seed);
    let mut scene = Scene::generate(&config.globe, &mut rng);
    for _ in 0..frames {
        scene.advance(&config.globe.motion, config.globe.spin);
    }
    let markers = scene.frames(frames as f32 * config.time_step, &config.globe.motion);
    serde_json::to_string_pretty(&SceneDump {
        seed: config.seed,
        frames,
        scene: &scene,
        markers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> DashboardConfig {
        DashboardConfig {
            mode: ViewMode::Dashboard,
            time_step: 0.03,
            seed: Some(7),
            range: TimeRange::Day,
            offline: true,
            globe: GlobeConfig::default(),
        }
    }

    fn screen_text(term: &Terminal) -> String {
        let (_, h) = term.size();
        (0..h).map(|y| term.row_text(y)).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn dashboard_renders_title_and_timestamp() {
        let term = render_frame_offscreen(&config(), 140, 44, 3);
        let text = screen_text(&term);
        assert!(term.row_text(0).contains(mock::TITLE));
        assert!(term.row_text(43).contains("TIMESTAMP: "));
        assert!(text.contains("ALERT HANDLING"));
        assert!(text.contains("ATTACKED ASSETS TOP5"));
        assert!(text.contains("115.231.54.13"));
        assert!(text.contains("RECON"));
    }

    #[test]
    fn narrow_terminal_shows_globe_only() {
        let layout = compute_layout(80, 40, ViewMode::Dashboard);
        assert!(layout.left.is_empty() && layout.right.is_empty() && layout.header.is_empty());
        assert_eq!(layout.globe, Rect::new(0, 0, 80, 39));

        let term = render_frame_offscreen(&config(), 80, 40, 0);
        assert!(!screen_text(&term).contains("ALERT HANDLING"));
        assert!(term.row_text(39).contains("TIMESTAMP: "));
    }

    #[test]
    fn wide_layout_tiles_the_screen() {
        let layout = compute_layout(140, 44, ViewMode::Dashboard);
        assert_eq!(layout.left.width, LEFT_WIDTH);
        assert_eq!(layout.right.right(), 140);
        assert_eq!(layout.globe.x, LEFT_WIDTH as i32);
        assert_eq!(layout.globe.right(), (140 - RIGHT_WIDTH) as i32);
        assert_eq!(layout.tickers.bottom(), 43);
        assert_eq!(layout.footer.y, 43);
    }

    #[test]
    fn keys_change_range_and_view() {
        let mut state = DashboardState::new(&config());
        let none = KeyModifiers::NONE;
        assert!(!state.handle_key(KeyCode::Char('w'), none));
        assert_eq!(state.view.range, TimeRange::Week);
        state.handle_key(KeyCode::Tab, none);
        assert_eq!(state.view.range, TimeRange::Month);
        state.handle_key(KeyCode::Char(' '), none);
        assert!(state.view.paused);
        state.handle_key(KeyCode::Char('?'), none);
        assert!(state.view.show_help);
        state.handle_key(KeyCode::Char('9'), none);
        assert_eq!(state.time_step, 0.2);
        state.handle_key(KeyCode::Char('+'), none);
        assert!(state.globe.zoom > 1.0);
        state.handle_key(KeyCode::Char('0'), none);
        assert_eq!(state.globe.zoom, 1.0);
        state.handle_key(KeyCode::Char('r'), none);
        assert!(state.regenerate);
        state.handle_key(KeyCode::Char('%'), none);
        assert_eq!(state.view.colors.scheme, 5);
        assert!(state.handle_key(KeyCode::Esc, none));
    }

    #[test]
    fn help_overlay_renders_when_toggled() {
        let cfg = config();
        let mut rng = seeded_rng(cfg.seed);
        let scene = Scene::generate(&cfg.globe, &mut rng);
        let mut renderer = GlobeRenderer::new(&mut rng);
        let arcs = scene.frames(0.0, &cfg.globe.motion);
        let globe_view = GlobeView::new(cfg.globe.tilt);
        let textures = EarthTextures::default();
        let frame = GlobeFrame {
            scene: &scene,
            arcs: &arcs,
            view: &globe_view,
            textures: &textures,
            clock: GlobeClock { secs: 0.0, utc_hours: 0.0 },
        };
        let mut view = ViewState::new(TimeRange::Day);
        view.show_help = true;
        let mut term = Terminal::offscreen(120, 40);
        render_dashboard(&mut term, &view, ViewMode::Dashboard, &mut renderer, &frame);
        assert!(screen_text(&term).contains("new attack scene"));
    }

    #[test]
    fn scene_dump_is_valid_json() {
        let json = dump_scene(&config(), 10).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["seed"], 7);
        assert_eq!(value["frames"], 10);
        assert_eq!(value["scene"]["nodes"].as_array().map(|n| n.len()), Some(12));
        let arcs = value["scene"]["arcs"].as_array().map(|a| a.len()).unwrap_or(0);
        assert_eq!(value["markers"].as_array().map(|m| m.len()), Some(arcs));
    }
}
