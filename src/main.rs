mod app;
mod color;
mod config;
mod data;
mod state;
mod ui;

use app::PipelineDashboardApp;
use config::DashboardConfig;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = DashboardConfig::load();
    log::info!("Pipeline data file: {}", config.data_path().display());
    let state = AppState::new(config);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Offshore Pipeline Projects Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(PipelineDashboardApp::new(state)))),
    )
}
