mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::TrialViewerApp;
use state::AppState;
use trial_viewer::config::AppConfig;

#[derive(Parser)]
#[command(name = "trial-viewer", version, about = "Per-subject trial results dashboard")]
struct Cli {
    /// Config file path (defaults to ./trial-viewer.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sheet export to load at startup (.csv, .json or .parquet)
    #[arg(long)]
    data: Option<PathBuf>,

    /// Schema mapping to interpret the columns with
    #[arg(long)]
    schema: Option<String>,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = AppConfig::discover(cli.config.as_deref())?;
    if let Some(data) = cli.data {
        config.source = Some(data);
    }
    if let Some(schema) = cli.schema {
        config.schema = schema;
    }
    let schema = config.resolve_schema()?;

    let source = config.source.clone();
    let mut state = AppState::new(config, schema);
    if let Some(path) = source {
        state.open_source(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Trial Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(TrialViewerApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
    .context("running the viewer window")
}
