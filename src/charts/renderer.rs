//! Static Chart Renderer
//! Writes the daily-cases line chart to a PNG file with plotters.
//!
//! Layout:
//! 1. Caption: "Kasus Harian" with the covered date span
//! 2. Mesh with date labels on X and thousands-grouped counts on Y
//! 3. Line series with a circle marker per date

use crate::format::thousands;
use crate::stats::DateSeries;
use chrono::NaiveDate;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const LINE: RGBColor = RGBColor(52, 152, 219);

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("No data to export")]
    NoData,
    #[error("Failed to render chart: {0}")]
    Render(String),
}

fn render_err(e: impl std::fmt::Display) -> ExportError {
    ExportError::Render(e.to_string())
}

/// X range covering the series; a single date is padded by a day each side.
pub fn date_range(series: &DateSeries) -> Option<(NaiveDate, NaiveDate)> {
    let first = series.first()?.date;
    let last = series.last()?.date;
    if first < last {
        Some((first, last))
    } else {
        Some((first.pred_opt()?, last.succ_opt()?))
    }
}

/// Upper Y bound with 10% headroom, never below 1.
pub fn cases_ceiling(series: &DateSeries) -> u64 {
    let max = series.iter().map(|p| p.total_cases).max().unwrap_or(0);
    (max + max / 10).max(1)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render `series` to a PNG at `path`.
    pub fn render_daily_cases_png(
        series: &DateSeries,
        path: &Path,
        width: u32,
        height: u32,
    ) -> Result<(), ExportError> {
        let (from, to) = date_range(series).ok_or(ExportError::NoData)?;

        let root = BitMapBackend::new(path, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_err)?;

        let caption = format!(
            "Kasus Harian {} s/d {}",
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        );

        let mut chart = ChartBuilder::on(&root)
            .caption(caption, ("sans-serif", 26))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(80)
            .build_cartesian_2d(from..to, 0u64..cases_ceiling(series))
            .map_err(render_err)?;

        chart
            .configure_mesh()
            .x_desc("Tanggal")
            .y_desc("Kasus")
            .x_labels(8)
            .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
            .y_label_formatter(&|v: &u64| thousands(*v))
            .draw()
            .map_err(render_err)?;

        chart
            .draw_series(LineSeries::new(
                series.iter().map(|p| (p.date, p.total_cases)),
                LINE.stroke_width(2),
            ))
            .map_err(render_err)?;

        chart
            .draw_series(
                series
                    .iter()
                    .map(|p| Circle::new((p.date, p.total_cases), 3, LINE.filled())),
            )
            .map_err(render_err)?;

        root.present().map_err(render_err)?;

        log::info!("Chart with {} points written to {}", series.len(), path.display());
        Ok(())
    }
}
