// main.rs - Window, runtime and tick driver wiring for the Rule 90 grid

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;
use rule90::{InputController, Settings, Simulation, SimulationClock};
use tracing::info;

mod canvas;
mod ui;

use canvas::CanvasSink;
use ui::{BUTTON_ROW_HEIGHT, R90App};

#[derive(Parser, Debug)]
#[command(name = "rule90", version, about = "Rule 90 grid with constant cells")]
struct Cli {
    /// TOML file with grid and clock settings.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Grid width in cells.
    #[arg(long)]
    width: Option<usize>,
    /// Grid height in cells.
    #[arg(long)]
    height: Option<usize>,
    /// Pixels per cell.
    #[arg(long)]
    scale: Option<usize>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = load_settings(&cli)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tick runtime")?;
    let canvas = CanvasSink::new(settings.width, settings.height);
    let simulation = Simulation::new(&settings, Box::new(canvas.clone()))?;
    let input = InputController::new(simulation.clone(), &settings)?;
    let clock = SimulationClock::spawn(simulation.clone(), runtime.handle());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([
                (settings.width * settings.scale) as f32,
                (settings.height * settings.scale) as f32 + BUTTON_ROW_HEIGHT,
            ])
            .with_resizable(false),
        ..Default::default()
    };

    let title = simulation.title();
    let app = R90App::new(simulation, input, canvas, settings.scale, clock, runtime);
    info!(width = settings.width, height = settings.height, scale = settings.scale, "opening window");

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            app.attach(cc.egui_ctx.clone());
            Box::new(app)
        }),
    )
    .map_err(|err| anyhow!("render surface failed: {err}"))?;

    info!("window closed");
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_settings(cli: &Cli) -> Result<Settings> {
    let mut settings = match &cli.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(width) = cli.width {
        settings.width = width;
    }
    if let Some(height) = cli.height {
        settings.height = height;
    }
    if let Some(scale) = cli.scale {
        settings.scale = scale;
    }
    settings.validate()?;
    Ok(settings)
}
