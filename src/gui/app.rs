//! Covid Dashboard Main Application
//! Main window with filter panel and dashboard view.

use crate::charts::StaticChartRenderer;
use crate::config::Settings;
use crate::data::{DataLoader, DataSourceError, Dataset};
use crate::gui::{ControlPanel, ControlPanelAction, DashboardView};
use crate::stats::Aggregator;
use egui::SidePanel;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;

const EXPORT_WIDTH: u32 = 1400;
const EXPORT_HEIGHT: u32 = 700;

/// CSV loading result from background thread
enum LoadResult {
    Complete(Arc<Dataset>),
    Error(DataSourceError),
}

/// Main application window. The loader it owns holds the session's dataset snapshot.
pub struct DashboardApp {
    title: String,
    loader: Option<Arc<DataLoader>>,
    control_panel: ControlPanel,
    view: DashboardView,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let mut app = Self::idle(settings.window.title);
        app.start_session(settings.data.path);
        app
    }

    fn idle(title: String) -> Self {
        Self {
            title,
            loader: None,
            control_panel: ControlPanel::new(),
            view: DashboardView::new(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Begin a new session over `path`, loading it in a background thread
    fn start_session(&mut self, path: PathBuf) {
        if self.is_loading {
            log::debug!("Ignoring {} while a load is running", path.display());
            self.control_panel
                .set_status("Still loading the current file, try again when it finishes");
            return;
        }

        self.view.clear();
        self.control_panel.clear_dataset();
        self.control_panel.csv_path = Some(path.clone());
        self.control_panel
            .set_status(&format!("Loading {}...", path.display()));
        self.is_loading = true;

        let loader = Arc::new(DataLoader::new(path));
        self.loader = Some(Arc::clone(&loader));

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        thread::spawn(move || {
            let result = match loader.load() {
                Ok(dataset) => LoadResult::Complete(dataset),
                Err(e) => LoadResult::Error(e),
            };
            let _ = tx.send(result);
        });
    }

    /// Handle CSV file selection
    fn handle_browse_csv(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        {
            self.start_session(path);
        }
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(LoadResult::Complete(dataset)) => {
                if let Some(loader) = &self.loader {
                    log::info!("Session started over {}", loader.path().display());
                }
                self.control_panel.update_dataset(&dataset);
                self.control_panel.set_status(&format!(
                    "Loaded {} rows, {} regions",
                    dataset.len(),
                    dataset.regions().len()
                ));
                self.is_loading = false;
                self.recompute();
            }
            Ok(LoadResult::Error(error)) => {
                log::error!("Failed to load case data: {}", error);
                self.control_panel.set_error(&error.to_string());
                self.is_loading = false;
            }
            Err(TryRecvError::Empty) => {
                self.load_rx = Some(rx);
            }
            Err(TryRecvError::Disconnected) => {
                self.control_panel.set_error("Loader stopped without a result");
                self.is_loading = false;
            }
        }
    }

    /// Re-run filter and aggregation for the current selection
    fn recompute(&mut self) {
        let Some(dataset) = self.loader.as_ref().and_then(|l| l.snapshot()) else {
            return;
        };

        let criteria = self.control_panel.criteria();
        let data = Aggregator::dashboard(&dataset, &criteria);
        log::debug!(
            "{} of {} records match {} regions in {}..={}",
            data.record_count,
            dataset.len(),
            criteria.selected_regions.len(),
            criteria.start_date,
            criteria.end_date
        );

        self.view.set_data(data);
        self.control_panel.export_enabled = self.view.has_series();
    }

    /// Handle PNG export of the daily-cases chart
    fn handle_export_chart(&mut self) {
        let Some(data) = &self.view.data else {
            self.control_panel.set_error("No chart to export");
            return;
        };

        let output_path = match rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("kasus_harian.png")
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match StaticChartRenderer::render_daily_cases_png(
            &data.series,
            &output_path,
            EXPORT_WIDTH,
            EXPORT_HEIGHT,
        ) {
            Ok(()) => {
                self.control_panel
                    .set_status(&format!("Chart saved to {}", output_path.display()));
            }
            Err(e) => {
                log::error!("Chart export failed: {}", e);
                self.control_panel.set_error(&e.to_string());
            }
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::BrowseCsv => self.handle_browse_csv(),
                        ControlPanelAction::FiltersChanged => self.recompute(),
                        ControlPanelAction::ExportChart => self.handle_export_chart(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        egui::CentralPanel::default().show(ctx, |ui| {
            self.view.show(ui, &self.title);
        });
    }
}
