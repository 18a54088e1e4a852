//! Chart Plotter Module
//! Interactive daily-cases line chart using egui_plot.

use crate::format::thousands;
use crate::stats::DateSeries;
use chrono::{Datelike, NaiveDate};
use egui::Color32;
use egui_plot::{Line, Plot, PlotPoints, Points};

pub const LINE_COLOR: Color32 = Color32::from_rgb(52, 152, 219); // Blue

/// Plot x coordinate for a date (days from the common era).
pub fn date_to_x(date: NaiveDate) -> f64 {
    f64::from(date.num_days_from_ce())
}

/// Date at a plot x coordinate, rounded to the nearest day.
pub fn x_to_date(x: f64) -> Option<NaiveDate> {
    if !x.is_finite() || x.abs() > f64::from(i32::MAX) {
        return None;
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Creates the dashboard's interactive charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Draw daily case totals as a line with point markers.
    /// X-axis: date, Y-axis: cases on that date
    pub fn draw_daily_cases(ui: &mut egui::Ui, series: &DateSeries, height: f32) {
        let points: Vec<[f64; 2]> = series
            .iter()
            .map(|p| [date_to_x(p.date), p.total_cases as f64])
            .collect();

        Plot::new("daily_cases")
            .height(height)
            .allow_scroll(false)
            .x_axis_label("Tanggal")
            .y_axis_label("Kasus Harian")
            .x_axis_formatter(|mark, _range| {
                x_to_date(mark.value)
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_default()
            })
            .y_axis_formatter(|mark, _range| {
                if mark.value >= 0.0 {
                    thousands(mark.value.round() as u64)
                } else {
                    String::new()
                }
            })
            .label_formatter(|_name, value| match x_to_date(value.x) {
                Some(date) if value.y >= 0.0 => format!(
                    "{}\n{} kasus",
                    date.format("%Y-%m-%d"),
                    thousands(value.y.round() as u64)
                ),
                _ => String::new(),
            })
            .include_y(0.0)
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points.iter().copied()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name("Kasus Harian"),
                );

                // Isolated dates have no line segment; markers keep them visible
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points.iter().copied()))
                        .radius(2.5)
                        .color(LINE_COLOR),
                );
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_coordinates_round_trip_dates() {
        let date = NaiveDate::from_ymd_opt(2021, 7, 15).unwrap();

        assert_eq!(x_to_date(date_to_x(date)), Some(date));
        assert_eq!(x_to_date(date_to_x(date) + 0.4), Some(date));
        assert_eq!(date_to_x(date.succ_opt().unwrap()) - date_to_x(date), 1.0);
    }

    #[test]
    fn non_finite_coordinates_have_no_date() {
        assert_eq!(x_to_date(f64::NAN), None);
        assert_eq!(x_to_date(f64::INFINITY), None);
    }
}
