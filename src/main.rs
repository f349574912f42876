//! Data Dash - Interactive CSV Data Analysis Dashboard
//!
//! Upload a CSV file, inspect summary statistics, query it with SQL and
//! build charts from its columns.

mod charts;
mod config;
mod data;
mod gui;
mod logging;
mod stats;

use config::DashboardConfig;
use eframe::egui;
use gui::DashboardApp;

fn main() -> anyhow::Result<()> {
    logging::init_logger();

    let config = DashboardConfig::from_env();
    tracing::info!(table = %config.table_name, "starting dashboard");

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Data Analysis Dashboard"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Data Dash",
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard exited with error: {e}"))
}
