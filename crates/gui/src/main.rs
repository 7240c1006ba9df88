use std::{
    fs, io,
    path::{Path, PathBuf},
    str::FromStr,
    sync::{LazyLock, RwLock},
};

use anyhow::{Context, Result};
use app::{APP_NAME, App, Setup};
use clap::Parser;
use common::{
    board::build_board,
    catalog::{self, Catalog},
    layout::BoardMetrics,
};
use iced::Theme;
use settings::keymap::Config;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod grid;
mod icons;
mod picker;
mod settings;

const DARK_THEME: Theme = Theme::TokyoNight;
const LIGHT_THEME: Theme = Theme::Light;

static CONFIG: LazyLock<RwLock<Config>> = LazyLock::new(|| RwLock::new(Config::default()));

#[derive(Parser, Debug)]
#[command(
    version,
    name = "Location Tracker",
    about = "A board for tracking which item turned up at which location."
)]
struct Args {
    /// Config file replacing the built-in key bindings and board shape
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// JSON item catalog: [{"name": .., "image": ..}, ..]
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// JSON list of location names
    #[arg(long)]
    locations: Option<PathBuf>,
    /// Directory item image paths are relative to
    #[arg(long)]
    images: Option<PathBuf>,
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_writer(io::stdout)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("location_tracker=info,common=info")),
        )
        .init();

    let args = Args::parse();
    if let Some(p) = &args.config {
        match load_config(p) {
            Ok(c) => {
                if let Ok(mut config) = CONFIG.write() {
                    *config = c;
                }
            }
            Err(e) => error!("Ignoring config: {:#}", e),
        }
    }

    let setup = setup(&args);
    let size = setup.window_size();
    info!(
        slots = setup.board.slots().len(),
        items = setup.catalog.len(),
        "Starting {}",
        APP_NAME
    );

    iced::application(
        move || (App::new(setup.clone()), iced::Task::none()),
        App::update,
        App::view,
    )
    .antialiasing(true)
    .window_size(size)
    .resizable(false)
    .theme(theme)
    .subscription(App::subscription)
    .title(APP_NAME)
    .run()
}

fn load_config(path: &Path) -> Result<Config> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    Config::from_str(&raw)
}

/// Builds the board and loads every icon. Override files that cannot be read
/// fall back to the built-in tables.
fn setup(args: &Args) -> Setup {
    let (layout, configured_images) = match CONFIG.read() {
        Ok(config) => (config.board, config.images.clone()),
        Err(_) => {
            let fallback = Config::new();
            (fallback.board, fallback.images)
        }
    };

    let catalog = match &args.catalog {
        Some(p) => Catalog::from_json_file(p).unwrap_or_else(|e| {
            error!("Using built-in item catalog: {:#}", e);
            Catalog::builtin()
        }),
        None => Catalog::builtin(),
    };
    let names = match &args.locations {
        Some(p) => catalog::locations_from_json_file(p).unwrap_or_else(|e| {
            error!("Using built-in locations: {:#}", e);
            catalog::builtin_locations()
        }),
        None => catalog::builtin_locations(),
    };

    let root = settings::resolve_image_root(args.images.as_ref().unwrap_or(&configured_images));
    info!("Loading images from {}", root.display());
    let icons = icons::Icons::load(&catalog, &root);

    Setup {
        board: build_board(layout, &names),
        catalog,
        icons,
        metrics: BoardMetrics::default(),
    }
}

pub fn theme(app: &App) -> Theme {
    match app.dark_mode {
        true => DARK_THEME,
        false => LIGHT_THEME,
    }
}
