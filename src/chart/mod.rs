//! Renders the sample history into a PNG chart for on-demand reports.

use std::path::Path;

use chrono::{DateTime, Local, TimeDelta};
use plotters::prelude::*;
use thiserror::Error;

use crate::models::{Sample, format_count};

/// Pixel dimensions of the rendered chart.
const CHART_SIZE: (u32, u32) = (1000, 600);

const BACKGROUND: RGBColor = RGBColor(64, 69, 112);
const LINE: RGBColor = RGBColor(255, 140, 0);
const GRID: RGBColor = RGBColor(176, 196, 222);

/// Errors produced while rendering the history chart.
#[derive(Debug, Error)]
pub enum RenderError {
    /// There are no samples to plot yet.
    #[error("No samples to plot")]
    NoData,

    /// The drawing backend failed.
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

/// Renders the sample history as a line chart and writes it to `path`.
///
/// Rendering is CPU and file work; call it off the async runtime.
pub fn render(samples: &[Sample], path: &Path) -> Result<(), RenderError> {
    if samples.is_empty() {
        return Err(RenderError::NoData);
    }
    draw(samples, path).map_err(|e| RenderError::Draw(e.to_string()))
}

fn draw(samples: &[Sample], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let points: Vec<(DateTime<Local>, u64)> =
        samples.iter().map(|s| (s.timestamp.with_timezone(&Local), s.count)).collect();

    let mut x_start = points[0].0;
    let mut x_end = points[points.len() - 1].0;
    if x_start == x_end {
        // A single sample cannot span an axis.
        x_start -= TimeDelta::minutes(5);
        x_end += TimeDelta::minutes(5);
    }

    let y_max = points.iter().map(|(_, count)| *count).max().unwrap_or(0);
    let y_top = (y_max + y_max / 10).max(10);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&BACKGROUND)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Player graph in last 12 hours",
            ("sans-serif", 24).into_font().color(&WHITE),
        )
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_start..x_end, 0u64..y_top)?;

    chart
        .configure_mesh()
        .bold_line_style(&GRID.mix(0.4))
        .light_line_style(&TRANSPARENT)
        .axis_style(&WHITE)
        .label_style(("sans-serif", 14).into_font().color(&WHITE))
        .x_labels(12)
        .x_label_formatter(&|ts| ts.format("%H:%M").to_string())
        .y_label_formatter(&|count| format_count(*count))
        .draw()?;

    chart.draw_series(
        LineSeries::new(points, ShapeStyle::from(&LINE).stroke_width(2)).point_size(1),
    )?;

    root.present()?;
    Ok(())
}
