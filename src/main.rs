//! Covid Dashboard - Regional Case Reporting
//!
//! Loads a CSV of daily case counts per province and shows filtered totals,
//! a daily-cases chart and a per-province table.

mod charts;
mod config;
mod data;
mod format;
mod gui;
mod stats;

use crate::config::Settings;
use eframe::egui;
use gui::DashboardApp;

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let settings = Settings::new()?;
    log::info!("Using case data at {}", settings.data.path.display());

    // Configure native options
    let title = settings.window.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window.width, settings.window.height])
            .with_min_inner_size([900.0, 600.0])
            .with_title(&title),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(DashboardApp::new(cc, settings)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to start dashboard window: {e}"))
}
