//! Table View Widget
//! Scrollable striped grid for DataFrames and the summary table.

use crate::charts::format_number;
use crate::data::values::format_any_value;
use crate::stats::SummaryTable;
use egui::{RichText, ScrollArea};
use polars::prelude::*;

/// Rows rendered at most; larger results are truncated with a note.
pub const MAX_RENDERED_ROWS: usize = 1000;

/// Pre-formatted table cells, built once and drawn every frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableCells {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

impl TableCells {
    pub fn from_dataframe(df: &DataFrame, max_rows: usize) -> Self {
        let shown = df.height().min(max_rows);
        let columns = df.get_columns();

        let headers = columns
            .iter()
            .map(|c| format!("{}\n{}", c.name(), c.dtype()))
            .collect();

        let rows = (0..shown)
            .map(|i| {
                columns
                    .iter()
                    .map(|c| {
                        c.get(i)
                            .map(|v| format_any_value(&v))
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();

        Self {
            headers,
            rows,
            total_rows: df.height(),
        }
    }

    /// Statistic labels in the first column, one column per numeric column.
    pub fn from_summary(table: &SummaryTable) -> Self {
        let mut headers = vec![String::new()];
        headers.extend(table.column_names());

        let rows: Vec<Vec<String>> = table
            .rows()
            .into_iter()
            .map(|(stat, values)| {
                let mut row = vec![stat.to_string()];
                row.extend(values.iter().map(|v| {
                    if stat == "count" {
                        format_number(*v)
                    } else {
                        format_float(*v)
                    }
                }));
                row
            })
            .collect();

        let total_rows = rows.len();
        Self {
            headers,
            rows,
            total_rows,
        }
    }

    pub fn is_truncated(&self) -> bool {
        self.rows.len() < self.total_rows
    }
}

pub fn format_float(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.4}", v)
    }
}

pub struct TableView;

impl TableView {
    pub fn show(ui: &mut egui::Ui, id: &str, cells: &TableCells, max_height: f32) {
        if cells.headers.is_empty() {
            ui.label(RichText::new("Empty table").italics());
            return;
        }

        egui::Frame::none()
            .fill(ui.visuals().extreme_bg_color)
            .rounding(5.0)
            .inner_margin(6.0)
            .show(ui, |ui| {
                ScrollArea::both()
                    .id_salt(id)
                    .max_height(max_height)
                    .auto_shrink([false, true])
                    .show(ui, |ui| {
                        egui::Grid::new(ui.make_persistent_id(format!("grid_{id}")))
                            .striped(true)
                            .min_col_width(60.0)
                            .spacing([12.0, 4.0])
                            .show(ui, |ui| {
                                for header in &cells.headers {
                                    ui.label(RichText::new(header).strong().size(12.0));
                                }
                                ui.end_row();

                                for row in &cells.rows {
                                    for cell in row {
                                        ui.label(RichText::new(cell).size(12.0).monospace());
                                    }
                                    ui.end_row();
                                }
                            });
                    });
            });

        if cells.is_truncated() {
            ui.label(
                RichText::new(format!(
                    "Showing first {} of {} rows",
                    cells.rows.len(),
                    cells.total_rows
                ))
                .size(11.0)
                .color(egui::Color32::GRAY),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::StatsCalculator;

    #[test]
    fn cells_from_dataframe() {
        let df = df! {
            "name" => [Some("ann"), None],
            "age" => [31i64, 45],
        }
        .unwrap();

        let cells = TableCells::from_dataframe(&df, 100);
        assert_eq!(cells.headers, vec!["name\nstr", "age\ni64"]);
        assert_eq!(cells.rows, vec![vec!["ann", "31"], vec!["null", "45"]]);
        assert!(!cells.is_truncated());
    }

    #[test]
    fn large_frames_are_truncated() {
        let values: Vec<i64> = (0..50).collect();
        let df = df! { "v" => values }.unwrap();
        let cells = TableCells::from_dataframe(&df, 10);
        assert_eq!(cells.rows.len(), 10);
        assert_eq!(cells.total_rows, 50);
        assert!(cells.is_truncated());
    }

    #[test]
    fn cells_from_summary() {
        let df = df! { "v" => [1.0, 2.0, 3.0, 4.0] }.unwrap();
        let cells = TableCells::from_summary(&StatsCalculator::describe(&df));
        assert_eq!(cells.headers, vec!["", "v"]);
        assert_eq!(cells.rows[0], vec!["count", "4"]);
        assert_eq!(cells.rows[1], vec!["mean", "2.5000"]);
        assert_eq!(cells.rows.len(), 8);
    }
}
