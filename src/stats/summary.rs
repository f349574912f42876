//! Statistics Calculator Module
//! Dataset overview metrics and per-column descriptive statistics.

use crate::data::values::{column_to_f64, is_float_dtype, is_numeric_dtype};
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Row labels of the summary table, in display order.
pub const SUMMARY_STATS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Headline metrics shown above the sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    /// Null cells plus NaN cells in floating columns.
    pub missing: usize,
}

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Values in `SUMMARY_STATS` order.
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Summary over all numeric columns: one entry per column.
#[derive(Debug, Clone, Default)]
pub struct SummaryTable {
    pub columns: Vec<ColumnSummary>,
}

impl SummaryTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.column.clone()).collect()
    }

    /// Rows as (statistic label, value per column).
    pub fn rows(&self) -> Vec<(&'static str, Vec<f64>)> {
        SUMMARY_STATS
            .iter()
            .enumerate()
            .map(|(i, stat)| (*stat, self.columns.iter().map(|c| c.values()[i]).collect()))
            .collect()
    }

    pub fn get(&self, column: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.column == column)
    }
}

/// Handles statistical calculations with multi-threading support.
pub struct StatsCalculator;

impl StatsCalculator {
    pub fn overview(df: &DataFrame) -> DatasetOverview {
        let missing = df
            .get_columns()
            .iter()
            .map(|col| col.null_count() + Self::nan_count(col))
            .sum();

        DatasetOverview {
            rows: df.height(),
            columns: df.width(),
            missing,
        }
    }

    fn nan_count(column: &Column) -> usize {
        if !is_float_dtype(column.dtype()) {
            return 0;
        }
        column
            .cast(&DataType::Float64)
            .ok()
            .and_then(|c| {
                c.as_materialized_series()
                    .f64()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().filter(|v| v.is_nan()).count())
            })
            .unwrap_or(0)
    }

    /// Describe every numeric column, in parallel.
    pub fn describe(df: &DataFrame) -> SummaryTable {
        let numeric: Vec<&Column> = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .collect();

        let columns = numeric
            .par_iter()
            .map(|col| {
                let values: Vec<f64> = column_to_f64(col)
                    .map(|vals| vals.into_iter().flatten().collect())
                    .unwrap_or_default();
                Self::summarize(col.name().as_str(), &values)
            })
            .collect();

        SummaryTable { columns }
    }

    /// Compute descriptive statistics for an array of values.
    pub fn summarize(column: &str, values: &[f64]) -> ColumnSummary {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnSummary {
            column: column.to_string(),
            count: values.len(),
            mean: values.iter().mean(),
            std: values.iter().std_dev(),
            min: sorted.first().copied().unwrap_or(f64::NAN),
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }
}
