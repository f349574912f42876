//! Chart Builder Module
//! Turns the selected columns of a DataFrame into drawable chart data.

use crate::charts::model::{
    gradient_color, ChartData, ChartKind, ChartSettings, Series, SeriesStyle, XAxis,
    MISSING_COLOR, PALETTE, PRIMARY_COLOR,
};
use crate::data::values::{column_to_f64, column_to_labels, is_numeric_dtype};
use polars::prelude::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("No column selected")]
    NoColumnSelected,
    #[error("Column not found: {0}")]
    ColumnNotFound(String),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("No data to plot")]
    NoData,
    #[error("Render error: {0}")]
    Render(String),
    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Bar width as a share of the category / value spacing.
const BAR_FILL: f64 = 0.8;

/// One histogram bin, `[start, end)` except the last which is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Builds chart data from the dataset and the chart settings.
pub struct ChartBuilder;

impl ChartBuilder {
    pub fn build(df: &DataFrame, settings: &ChartSettings) -> Result<ChartData, ChartError> {
        match settings.kind {
            ChartKind::Line => Self::line(df, &settings.x_col, &settings.y_col),
            ChartKind::Bar => Self::bar(df, &settings.x_col, &settings.y_col),
            ChartKind::Scatter => Self::scatter(
                df,
                &settings.x_col,
                &settings.y_col,
                settings.color_col.as_deref(),
            ),
            ChartKind::Histogram => Self::histogram(df, &settings.hist_col, settings.bins),
        }
    }

    fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ChartError> {
        if name.is_empty() {
            return Err(ChartError::NoColumnSelected);
        }
        df.column(name)
            .map_err(|_| ChartError::ColumnNotFound(name.to_string()))
    }

    fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>, ChartError> {
        let column = Self::column(df, name)?;
        if !is_numeric_dtype(column.dtype()) {
            return Err(ChartError::NotNumeric(name.to_string()));
        }
        Ok(column_to_f64(column)?)
    }

    /// X positions per row. Non-numeric columns become categories placed at
    /// their first-appearance index.
    fn x_positions(df: &DataFrame, name: &str) -> Result<(XAxis, Vec<Option<f64>>), ChartError> {
        let column = Self::column(df, name)?;
        if is_numeric_dtype(column.dtype()) {
            return Ok((XAxis::Numeric, column_to_f64(column)?));
        }

        let mut labels: Vec<String> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let positions = column_to_labels(column)?
            .into_iter()
            .map(|label| {
                label.map(|l| {
                    let next = labels.len();
                    let pos = *index.entry(l.clone()).or_insert_with(|| {
                        labels.push(l);
                        next
                    });
                    pos as f64
                })
            })
            .collect();

        Ok((XAxis::Categorical(labels), positions))
    }

    fn pairs(xs: &[Option<f64>], ys: &[Option<f64>]) -> Vec<[f64; 2]> {
        xs.iter()
            .zip(ys)
            .filter_map(|(x, y)| Some([(*x)?, (*y)?]))
            .collect()
    }

    /// Line through the rows in file order.
    pub fn line(df: &DataFrame, x_col: &str, y_col: &str) -> Result<ChartData, ChartError> {
        let (x_axis, xs) = Self::x_positions(df, x_col)?;
        let ys = Self::numeric_values(df, y_col)?;

        let points = Self::pairs(&xs, &ys);
        if points.is_empty() {
            return Err(ChartError::NoData);
        }

        Ok(ChartData {
            title: format!("{y_col} by {x_col}"),
            x_label: x_col.to_string(),
            y_label: y_col.to_string(),
            x_axis,
            series: vec![Series::new(y_col, SeriesStyle::Line, PRIMARY_COLOR, points)],
            show_legend: false,
        })
    }

    /// One bar per distinct X value; repeated X values stack into one bar.
    pub fn bar(df: &DataFrame, x_col: &str, y_col: &str) -> Result<ChartData, ChartError> {
        let (x_axis, xs) = Self::x_positions(df, x_col)?;
        let ys = Self::numeric_values(df, y_col)?;

        let mut totals: Vec<[f64; 2]> = Vec::new();
        let mut slot: HashMap<u64, usize> = HashMap::new();
        for [x, y] in Self::pairs(&xs, &ys) {
            // -0.0 and 0.0 share a bar
            let x = if x == 0.0 { 0.0 } else { x };
            match slot.get(&x.to_bits()) {
                Some(&i) => totals[i][1] += y,
                None => {
                    slot.insert(x.to_bits(), totals.len());
                    totals.push([x, y]);
                }
            }
        }
        if totals.is_empty() {
            return Err(ChartError::NoData);
        }

        let width = match x_axis {
            XAxis::Categorical(_) => BAR_FILL,
            XAxis::Numeric => Self::min_gap(totals.iter().map(|p| p[0])) * BAR_FILL,
        };

        Ok(ChartData {
            title: format!("{y_col} by {x_col}"),
            x_label: x_col.to_string(),
            y_label: y_col.to_string(),
            x_axis,
            series: vec![Series::new(
                y_col,
                SeriesStyle::Bars { width },
                PRIMARY_COLOR,
                totals,
            )],
            show_legend: false,
        })
    }

    /// Smallest spacing between distinct positions, 1.0 when there is only one.
    fn min_gap(positions: impl Iterator<Item = f64>) -> f64 {
        let mut sorted: Vec<f64> = positions.collect();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        sorted
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|gap| *gap > 0.0)
            .fold(None, |acc: Option<f64>, gap| Some(acc.map_or(gap, |a| a.min(gap))))
            .unwrap_or(1.0)
    }

    /// Scatter of two numeric columns, optionally colored by a third.
    pub fn scatter(
        df: &DataFrame,
        x_col: &str,
        y_col: &str,
        color_col: Option<&str>,
    ) -> Result<ChartData, ChartError> {
        let xs = Self::numeric_values(df, x_col)?;
        let ys = Self::numeric_values(df, y_col)?;

        let mut data = ChartData {
            title: format!("{y_col} vs {x_col}"),
            x_label: x_col.to_string(),
            y_label: y_col.to_string(),
            x_axis: XAxis::Numeric,
            series: Vec::new(),
            show_legend: false,
        };

        let Some(color_col) = color_col else {
            let points = Self::pairs(&xs, &ys);
            if points.is_empty() {
                return Err(ChartError::NoData);
            }
            data.series
                .push(Series::new(y_col, SeriesStyle::Markers, PRIMARY_COLOR, points));
            return Ok(data);
        };

        let color_column = Self::column(df, color_col)?;
        data.show_legend = true;

        if is_numeric_dtype(color_column.dtype()) {
            let shades = column_to_f64(color_column)?;
            let (lo, hi) = shades
                .iter()
                .flatten()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                    (lo.min(v), hi.max(v))
                });
            let span = hi - lo;

            let mut points = Vec::new();
            let mut colors = Vec::new();
            for ((x, y), shade) in xs.iter().zip(&ys).zip(&shades) {
                let (Some(x), Some(y)) = (x, y) else {
                    continue;
                };
                points.push([*x, *y]);
                colors.push(match shade {
                    Some(v) if span > 0.0 => gradient_color((v - lo) / span),
                    Some(_) => gradient_color(0.5),
                    None => MISSING_COLOR,
                });
            }
            if points.is_empty() {
                return Err(ChartError::NoData);
            }

            let mut series = Series::new(color_col, SeriesStyle::Markers, PRIMARY_COLOR, points);
            series.point_colors = Some(colors);
            data.series.push(series);
            return Ok(data);
        }

        // Discrete colors: one series per distinct value
        let labels = column_to_labels(color_column)?;
        let mut groups: Vec<(String, Vec<[f64; 2]>)> = Vec::new();
        let mut slot: HashMap<String, usize> = HashMap::new();
        for ((x, y), label) in xs.iter().zip(&ys).zip(labels) {
            let (Some(x), Some(y)) = (x, y) else {
                continue;
            };
            let label = label.unwrap_or_else(|| "null".to_string());
            let i = *slot.entry(label.clone()).or_insert_with(|| {
                groups.push((label, Vec::new()));
                groups.len() - 1
            });
            groups[i].1.push([*x, *y]);
        }
        if groups.is_empty() {
            return Err(ChartError::NoData);
        }

        data.series = groups
            .into_iter()
            .enumerate()
            .map(|(i, (name, points))| {
                Series::new(name, SeriesStyle::Markers, PALETTE[i % PALETTE.len()], points)
            })
            .collect();
        Ok(data)
    }

    /// Equal-width histogram of a numeric column.
    pub fn histogram(df: &DataFrame, col: &str, bins: usize) -> Result<ChartData, ChartError> {
        let values: Vec<f64> = Self::numeric_values(df, col)?
            .into_iter()
            .flatten()
            .collect();

        let histogram = Self::histogram_bins(&values, bins);
        if histogram.is_empty() {
            return Err(ChartError::NoData);
        }

        let width = histogram[0].end - histogram[0].start;
        let points = histogram
            .iter()
            .map(|b| [(b.start + b.end) / 2.0, b.count as f64])
            .collect();

        Ok(ChartData {
            title: format!("Distribution of {col}"),
            x_label: col.to_string(),
            y_label: "count".to_string(),
            x_axis: XAxis::Numeric,
            series: vec![Series::new(
                "count",
                SeriesStyle::Bars { width },
                PRIMARY_COLOR,
                points,
            )],
            show_legend: false,
        })
    }

    /// Split the finite `values` into `bins` equal-width bins between min and max.
    pub fn histogram_bins(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if values.is_empty() || bins == 0 {
            return Vec::new();
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });

        if max - min <= f64::EPSILON {
            return vec![HistogramBin {
                start: min - 0.5,
                end: min + 0.5,
                count: values.len(),
            }];
        }

        let width = (max - min) / bins as f64;
        let mut result: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                count: 0,
            })
            .collect();

        for &v in &values {
            let idx = (((v - min) / width).floor() as usize).min(bins - 1);
            result[idx].count += 1;
        }

        result
    }
}
