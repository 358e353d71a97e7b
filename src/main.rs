mod analysis;
mod app;
mod color;
mod config;
mod data;
mod estimate;
mod state;
mod stats;
mod ui;

use anyhow::Result;
use app::WineExplorerApp;
use clap::Parser;
use config::Config;
use data::context::DataContext;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    let config = Config::parse();
    env_logger::Builder::new()
        .filter_level(config.level_filter()?)
        .parse_default_env()
        .init();
    config.validate()?;

    let ctx = DataContext::load(&config.catalog, &config.clients).inspect_err(|e| {
        log::error!("Failed to load datasets: {e:#}");
    })?;
    let state = AppState::new(ctx, &config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 450.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Wine Explorer",
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the logo and banner.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(WineExplorerApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("running the UI: {e}"))
}
