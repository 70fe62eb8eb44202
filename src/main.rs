mod braille;
mod clock;
mod colors;
mod config;
mod continents;
mod dashboard;
mod error;
mod globe;
mod help;
mod layout;
mod logging;
mod mock;
mod panels;
mod scene;
mod settings;
mod terminal;
mod texture;

use clap::{Parser, Subcommand};
use config::{DashboardConfig, GlobeConfig, TimeRange, ViewMode};
use settings::Settings;
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "sitcen")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.1.0")]
#[command(about = "Terminal security situation center: mock threat panels around an animated attack globe", long_about = None)]
struct Cli {
    /// Animation speed (seconds per frame)
    #[arg(short, long, global = true, default_value = "0.03")]
    time: f32,

    /// Random seed for reproducibility
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// Skip downloading earth textures (flat globe)
    #[arg(long, global = true)]
    offline: bool,

    /// Write logs to this file (overrides [log] file in config.toml)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full-screen dashboard: panels around the globe
    Dashboard {
        /// Initial trend chart range
        #[arg(short, long, value_enum, default_value_t = TimeRange::Day)]
        range: TimeRange,
    },

    /// Full-screen globe without panels
    Globe,

    /// Render one dashboard frame to stdout (no interactive display)
    Print {
        /// Frame width in columns
        #[arg(short = 'W', long, default_value = "120")]
        width: u16,

        /// Frame height in rows
        #[arg(short = 'H', long, default_value = "40")]
        height: u16,

        /// Trend chart range
        #[arg(short, long, value_enum, default_value_t = TimeRange::Day)]
        range: TimeRange,

        /// Animation steps to run before rendering
        #[arg(short, long, default_value = "0")]
        frames: usize,
    },

    /// Dump the generated globe scene as JSON
    Scene {
        /// Animation steps to run before dumping
        #[arg(short, long, default_value = "0")]
        frames: usize,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load();
    let log_file = cli.log_file.clone().or_else(|| settings.log.file.clone());
    logging::init(log_file.as_deref(), settings.log.level.as_deref())?;
    settings.report();

    let mut globe = GlobeConfig::default();
    settings.globe.apply(&mut globe);

    let mut config = DashboardConfig {
        mode: ViewMode::Dashboard,
        time_step: cli.time.max(0.001),
        seed: cli.seed,
        range: TimeRange::Day,
        offline: cli.offline,
        globe,
    };

    match cli.command {
        Commands::Dashboard { range } => {
            config.range = range;
            dashboard::run(config)?;
        }
        Commands::Globe => {
            config.mode = ViewMode::GlobeOnly;
            dashboard::run(config)?;
        }
        Commands::Print {
            width,
            height,
            range,
            frames,
        } => {
            config.range = range;
            info!(width, height, frames, "printing frame");
            let term = dashboard::render_frame_offscreen(&config, width.max(1), height.max(1), frames);
            term.print_to_stdout()?;
        }
        Commands::Scene { frames } => {
            let json = dashboard::dump_scene(&config, frames).map_err(io::Error::other)?;
            println!("{}", json);
        }
    }

    Ok(())
}
