use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use cabin::app::GameApp;
use cabin::config::GameConfig;
use cabin::engine::window::GameWindow;
use cabin::scene::SceneId;
use clap::Parser;

#[derive(Parser)]
#[command(name = "cabin", about = "Tiny cabin: cutscenes and a walkable village")]
struct Args {
    /// Scene to start in.
    #[arg(long, value_enum, default_value_t = SceneId::PaperPlane)]
    scene: SceneId,

    /// JSON file overriding the built-in tunables.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,
}

fn run(args: Args) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(width) = args.width {
        config.window.width = width;
    }
    if let Some(height) = args.height {
        config.window.height = height;
    }
    config.validate()?;

    let sdl = sdl2::init().map_err(|e| anyhow!("init SDL2: {e}"))?;
    let window = GameWindow::new(&sdl, &config.window).context("open window")?;

    let mut app = GameApp::new(config, args.scene).with_context(|| format!("start scene {}", args.scene))?;
    app.run(&sdl, &window)
}

fn main() -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
