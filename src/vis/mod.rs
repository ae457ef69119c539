//! Diagnostic plots using Plotters
//!
//! Two EDA images: a heatmap of missing values and a collage of
//! distribution panels. Both are written as PNG files.

use std::path::Path;

use plotters::prelude::*;

use crate::core::error::{Error, Result};
use crate::dataframe::DataFrame;
use crate::na::NA;

/// Plot dimensions and title
#[derive(Debug, Clone)]
pub struct PlotSettings {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Plot title
    pub title: String,
}

impl Default for PlotSettings {
    fn default() -> Self {
        PlotSettings {
            width: 1400,
            height: 600,
            title: String::new(),
        }
    }
}

impl PlotSettings {
    /// Set the title (builder pattern)
    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }
}

const CELL_COLOR: RGBColor = RGBColor(38, 70, 83);
const BAR_COLOR: RGBColor = RGBColor(42, 157, 143);
const POINT_COLOR: RGBColor = RGBColor(231, 111, 81);

/// Draw a heatmap of missing values: one cell per (row, column), colored
/// where the entry is absent.
pub fn missing_value_heatmap<P: AsRef<Path>>(
    df: &DataFrame,
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    if df.row_count() == 0 || df.column_count() == 0 {
        return Err(Error::EmptyData(
            "cannot draw a heatmap of an empty dataset".to_string(),
        ));
    }

    let root =
        BitMapBackend::new(path.as_ref(), (settings.width, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let n_cols = df.column_count();
    let n_rows = df.row_count();

    let title = if settings.title.is_empty() {
        "Missing values"
    } else {
        &settings.title
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(0f64..n_cols as f64, 0f64..n_rows as f64)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("column")
        .y_desc("row")
        .draw()?;

    for (col_idx, name) in df.column_names().iter().enumerate() {
        let mask = df.column(name)?.is_na();
        chart.draw_series(mask.iter().enumerate().filter(|(_, is_na)| **is_na).map(
            |(row_idx, _)| {
                Rectangle::new(
                    [
                        (col_idx as f64, row_idx as f64),
                        (col_idx as f64 + 1.0, row_idx as f64 + 1.0),
                    ],
                    CELL_COLOR.filled(),
                )
            },
        ))?;
    }

    root.present()?;
    Ok(())
}

/// Draw a grid of distribution panels: count bars for `bar_columns` and
/// value-vs-target scatters for `scatter_columns`.
pub fn distribution_collage<P: AsRef<Path>>(
    df: &DataFrame,
    bar_columns: &[&str],
    scatter_columns: &[&str],
    target: &str,
    path: P,
    settings: &PlotSettings,
) -> Result<()> {
    let n_panels = bar_columns.len() + scatter_columns.len();
    if n_panels == 0 {
        return Err(Error::EmptyData(
            "no columns selected for the collage".to_string(),
        ));
    }

    let root =
        BitMapBackend::new(path.as_ref(), (settings.width, settings.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let grid_cols = n_panels.div_ceil(2);
    let areas = root.split_evenly((2, grid_cols));

    let mut panel = 0;
    for column in bar_columns {
        draw_count_bars(df, column, &areas[panel])?;
        panel += 1;
    }
    for column in scatter_columns {
        draw_target_scatter(df, column, target, &areas[panel])?;
        panel += 1;
    }

    root.present()?;
    Ok(())
}

type Panel<'a> = DrawingArea<BitMapBackend<'a>, plotters::coord::Shift>;

fn draw_count_bars(df: &DataFrame, column: &str, area: &Panel) -> Result<()> {
    let counts = df.value_counts(column)?;
    if counts.is_empty() {
        return Err(Error::EmptyData(format!(
            "column '{}' has no values to plot",
            column
        )));
    }

    let max_count = counts.iter().map(|(_, c)| *c).max().unwrap() as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(column, ("sans-serif", 20).into_font())
        .margin(8)
        .x_label_area_size(25)
        .y_label_area_size(40)
        .build_cartesian_2d(0f64..counts.len() as f64, 0f64..max_count * 1.1)?;

    chart.configure_mesh().disable_x_mesh().y_desc("count").draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(i, (_, count))| {
        Rectangle::new(
            [(i as f64 + 0.1, 0.0), (i as f64 + 0.9, *count as f64)],
            BAR_COLOR.filled(),
        )
    }))?;

    Ok(())
}

fn draw_target_scatter(df: &DataFrame, column: &str, target: &str, area: &Panel) -> Result<()> {
    let target_column = df.column(target)?;
    let target_series = target_column.as_float64().ok_or(Error::TypeMismatch {
        column: target.to_string(),
        expected: "float64",
        found: target_column.type_name(),
    })?;

    let x_values = positional_values(df, column)?;

    let mut points: Vec<(f64, f64)> = Vec::new();
    for (x, y) in x_values.iter().zip(target_series.values()) {
        if let (NA::Value(x), NA::Value(y)) = (x, y) {
            points.push((*x, *y));
        }
    }
    if points.is_empty() {
        return Err(Error::EmptyData(format!(
            "no complete ({}, {}) pairs to plot",
            column, target
        )));
    }

    let x_max = points.iter().map(|(x, _)| *x).fold(f64::NEG_INFINITY, f64::max);
    let y_max = points.iter().map(|(_, y)| *y).fold(f64::NEG_INFINITY, f64::max);

    let mut chart = ChartBuilder::on(area)
        .caption(
            format!("{} vs {}", column, target),
            ("sans-serif", 20).into_font(),
        )
        .margin(8)
        .x_label_area_size(25)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..x_max + 0.5, 0f64..y_max * 1.05)?;

    chart.configure_mesh().y_desc(target).draw()?;

    chart.draw_series(
        points
            .iter()
            .map(|(x, y)| Circle::new((*x, *y), 2, POINT_COLOR.filled())),
    )?;

    Ok(())
}

/// Numeric positions for a column: values as-is when numeric, otherwise
/// category codes in first-encountered order.
fn positional_values(df: &DataFrame, column: &str) -> Result<Vec<NA<f64>>> {
    let column_data = df.column(column)?;
    if let Some(series) = column_data.as_float64() {
        return Ok(series.values().to_vec());
    }

    let series = column_data.as_str().unwrap();
    let mut codes: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut values = Vec::with_capacity(series.len());
    for v in series.values() {
        match v {
            NA::Value(label) => {
                let next = codes.len();
                let code = *codes.entry(label.clone()).or_insert(next);
                values.push(NA::Value(code as f64));
            }
            NA::NA => values.push(NA::NA),
        }
    }
    Ok(values)
}
