mod app;
mod color;
mod state;
mod ui;

use std::sync::Arc;

use anyhow::{anyhow, Context};
use app::StatZoneApp;
use eframe::egui;
use ipl_statzone::{load_dataset, AppConfig};
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let dataset = load_dataset(&config.dataset_path)
        .with_context(|| format!("cannot start without {}", config.dataset_path.display()))?;
    let state = AppState::new(Arc::new(dataset), config.comparison_options());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 820.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "IPL StatZone",
        options,
        Box::new(move |_cc| Ok(Box::new(StatZoneApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
