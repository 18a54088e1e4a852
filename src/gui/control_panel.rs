//! Control Panel Widget
//! Left side panel with data source, region and date filters.

use crate::data::{Dataset, FilterCriteria};
use chrono::NaiveDate;
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

const DATE_INPUT_FORMAT: &str = "%Y-%m-%d";

/// Parse a date typed into one of the range fields.
pub fn parse_date_input(text: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(text.trim(), DATE_INPUT_FORMAT)
        .map_err(|_| format!("'{}' is not a YYYY-MM-DD date", text.trim()))
}

/// Left side control panel with file selection and filter controls.
pub struct ControlPanel {
    pub csv_path: Option<PathBuf>,
    pub regions: Vec<String>,
    pub selected_regions: Vec<bool>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    start_text: String,
    end_text: String,
    date_error: Option<String>,
    pub status: String,
    pub status_is_error: bool,
    pub export_enabled: bool,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            csv_path: None,
            regions: Vec::new(),
            selected_regions: Vec::new(),
            start_date: NaiveDate::default(),
            end_date: NaiveDate::default(),
            start_text: String::new(),
            end_text: String::new(),
            date_error: None,
            status: "Ready".to_string(),
            status_is_error: false,
            export_enabled: false,
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset filters to the defaults of a freshly loaded dataset
    pub fn update_dataset(&mut self, dataset: &Dataset) {
        let defaults = FilterCriteria::for_dataset(dataset);
        self.regions = defaults.selected_regions.into_iter().collect();
        self.selected_regions = vec![true; self.regions.len()];
        self.set_start_date(defaults.start_date);
        self.set_end_date(defaults.end_date);
        self.date_error = None;
    }

    /// Forget the previous dataset's choices
    pub fn clear_dataset(&mut self) {
        self.regions.clear();
        self.selected_regions.clear();
        self.export_enabled = false;
    }

    /// Current filter selection
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            self.regions
                .iter()
                .zip(self.selected_regions.iter())
                .filter(|(_, &selected)| selected)
                .map(|(region, _)| region.clone()),
            self.start_date,
            self.end_date,
        )
    }

    pub fn set_start_date(&mut self, date: NaiveDate) {
        self.start_date = date;
        self.start_text = date.format(DATE_INPUT_FORMAT).to_string();
    }

    pub fn set_end_date(&mut self, date: NaiveDate) {
        self.end_date = date;
        self.end_text = date.format(DATE_INPUT_FORMAT).to_string();
    }

    /// Apply the typed date texts. Returns true when a bound changed.
    ///
    /// An unparseable entry is reported and the previous bound is kept.
    pub fn commit_date_inputs(&mut self) -> bool {
        let before = (self.start_date, self.end_date);
        self.date_error = None;

        match parse_date_input(&self.start_text) {
            Ok(date) => self.set_start_date(date),
            Err(e) => self.date_error = Some(e),
        }
        match parse_date_input(&self.end_text) {
            Ok(date) => self.set_end_date(date),
            Err(e) => self.date_error = Some(e),
        }

        before != (self.start_date, self.end_date)
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🔎 Filter Data")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== CSV File Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .csv_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());

                    ui.label(RichText::new(&path_text).size(12.0));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Browse").clicked() {
                            action = ControlPanelAction::BrowseCsv;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Region Section =====
        ui.label(RichText::new("🗺 Pilih Provinsi").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(220.0).show(ui, |ui| {
                    for (region, selected) in
                        self.regions.iter().zip(self.selected_regions.iter_mut())
                    {
                        if ui.checkbox(selected, region).changed() {
                            action = ControlPanelAction::FiltersChanged;
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.selected_regions.iter_mut().for_each(|v| *v = true);
                action = ControlPanelAction::FiltersChanged;
            }
            if ui.small_button("Clear All").clicked() {
                self.selected_regions.iter_mut().for_each(|v| *v = false);
                action = ControlPanelAction::FiltersChanged;
            }
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Date Range Section =====
        ui.label(RichText::new("📅 Rentang Tanggal").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 110.0;
        let mut date_edited = false;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Tanggal Mulai:"));
            date_edited |= ui.text_edit_singleline(&mut self.start_text).lost_focus();
        });
        ui.add_space(5.0);
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Tanggal Akhir:"));
            date_edited |= ui.text_edit_singleline(&mut self.end_text).lost_focus();
        });

        if date_edited && self.commit_date_inputs() {
            action = ControlPanelAction::FiltersChanged;
        }

        if let Some(error) = &self.date_error {
            ui.label(
                RichText::new(error)
                    .size(11.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.export_enabled, |ui| {
                let button = egui::Button::new(RichText::new("🖼 Save Chart as PNG").size(14.0))
                    .min_size(egui::vec2(180.0, 30.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::ExportChart;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Status Section =====
        let status_color = if self.status_is_error {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, error: &str) {
        self.status = format!("Error: {}", error);
        self.status_is_error = true;
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseCsv,
    FiltersChanged,
    ExportChart,
}
