//! Dashboard View Widget
//! Central panel with metric cards, the daily-cases chart and the per-region table.

use crate::charts::ChartPlotter;
use crate::format::{percent, thousands};
use crate::stats::{DashboardData, RegionSummaryRow, SummaryMetrics};
use egui::{Color32, RichText, ScrollArea};

const CARD_WIDTH: f32 = 200.0;
const CHART_HEIGHT: f32 = 320.0;
const SECTION_SPACING: f32 = 15.0;

/// Scrollable view of the aggregates for the current selection.
#[derive(Default)]
pub struct DashboardView {
    pub data: Option<DashboardData>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.data = None;
    }

    pub fn set_data(&mut self, data: DashboardData) {
        self.data = Some(data);
    }

    /// Whether there is a chart worth exporting
    pub fn has_series(&self) -> bool {
        self.data.as_ref().is_some_and(|d| !d.series.is_empty())
    }

    /// Draw the dashboard
    pub fn show(&self, ui: &mut egui::Ui, title: &str) {
        let Some(data) = &self.data else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new("No Data").size(20.0));
            });
            return;
        };

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(format!("📊 {}", title)).size(24.0).strong());
                ui.label(
                    RichText::new(format!("{} records selected", thousands(data.record_count as u64)))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("📈 Statistik Agregat").size(16.0).strong());
                ui.add_space(5.0);
                Self::draw_metric_cards(ui, &data.summary);
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("📅 Grafik Kasus Harian").size(16.0).strong());
                ui.add_space(5.0);
                if data.series.is_empty() {
                    ui.label(RichText::new("No records match the current filter").color(Color32::GRAY));
                } else {
                    ChartPlotter::draw_daily_cases(ui, &data.series, CHART_HEIGHT);
                }
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("🗺 Data Per Provinsi").size(16.0).strong());
                ui.add_space(5.0);
                Self::draw_region_table(ui, &data.regions);
            });
    }

    fn draw_metric_cards(ui: &mut egui::Ui, summary: &SummaryMetrics) {
        let cards = [
            ("Total Kasus", thousands(summary.total_cases)),
            ("Total Sembuh", thousands(summary.total_recovered)),
            ("Total Meninggal", thousands(summary.total_deceased)),
            ("Tingkat Kesembuhan", percent(summary.recovery_rate)),
            ("Rasio Kematian", percent(summary.fatality_rate)),
        ];

        ui.horizontal_wrapped(|ui| {
            for (label, value) in cards {
                egui::Frame::none()
                    .rounding(8.0)
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .inner_margin(12.0)
                    .show(ui, |ui| {
                        ui.set_width(CARD_WIDTH);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(label).size(12.0).color(Color32::GRAY));
                            ui.label(RichText::new(value).size(22.0).strong());
                        });
                    });
                ui.add_space(10.0);
            }
        });
    }

    fn draw_region_table(ui: &mut egui::Ui, rows: &[RegionSummaryRow]) {
        if rows.is_empty() {
            ui.label(RichText::new("No regions selected").color(Color32::GRAY));
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("region_table")
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for header in [
                            "Provinsi",
                            "Kasus",
                            "Sembuh",
                            "Meninggal",
                            "Tingkat Kesembuhan (%)",
                            "Rasio Kematian (%)",
                        ] {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in rows {
                            ui.label(RichText::new(&row.region).size(12.0));
                            ui.label(RichText::new(thousands(row.total_cases)).size(12.0));
                            ui.label(RichText::new(thousands(row.total_recovered)).size(12.0));
                            ui.label(RichText::new(thousands(row.total_deceased)).size(12.0));
                            ui.label(RichText::new(percent(row.recovery_rate)).size(12.0));
                            ui.label(RichText::new(percent(row.fatality_rate)).size(12.0));
                            ui.end_row();
                        }
                    });
            });
    }
}
