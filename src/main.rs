mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use anyhow::Result;
use app::SalesDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::load()?;
    log::info!("Sales source: {}", config.source.path.display());

    // One-time load; a failure is shown in place of the dashboard.
    let state = AppState::new(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Dashboard",
        options,
        Box::new(|cc| {
            // Install image loaders so egui can render the banner (file:// + png/jpg).
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(SalesDashboardApp::new(state)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
