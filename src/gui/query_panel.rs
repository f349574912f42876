//! SQL Query Panel
//! Query text box, run button and the result or error.

use crate::data::QueryRunner;
use crate::gui::table_view::{TableCells, TableView, MAX_RENDERED_ROWS};
use egui::{Color32, RichText};
use polars::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    Table {
        cells: TableCells,
        rows: usize,
        columns: usize,
    },
    Error(String),
}

pub struct QueryPanel {
    pub query: String,
    pub outcome: Option<QueryOutcome>,
}

impl QueryPanel {
    pub fn new(default_query: &str) -> Self {
        Self {
            query: default_query.to_string(),
            outcome: None,
        }
    }

    /// Forget the previous result (new file loaded).
    pub fn reset(&mut self) {
        self.outcome = None;
    }

    /// Run the current query against `df`.
    pub fn run(&mut self, df: &DataFrame, table_name: &str) {
        let outcome = match QueryRunner::run(df, table_name, &self.query) {
            Ok(result) => {
                tracing::info!(rows = result.height(), "query succeeded");
                QueryOutcome::Table {
                    cells: TableCells::from_dataframe(&result, MAX_RENDERED_ROWS),
                    rows: result.height(),
                    columns: result.width(),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "query failed");
                QueryOutcome::Error(format!("Error executing query: {e}"))
            }
        };
        self.outcome = Some(outcome);
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame, table_name: &str) {
        ui.label(format!("Enter your SQL query (table name: {table_name}):"));
        ui.add(
            egui::TextEdit::multiline(&mut self.query)
                .code_editor()
                .desired_rows(4)
                .desired_width(f32::INFINITY),
        );

        ui.add_space(5.0);
        if ui
            .button(RichText::new("▶ Run Query").size(14.0))
            .clicked()
        {
            self.run(df, table_name);
        }
        ui.add_space(5.0);

        match &self.outcome {
            Some(QueryOutcome::Table {
                cells,
                rows,
                columns,
            }) => {
                ui.label(
                    RichText::new(format!("{rows} rows × {columns} columns"))
                        .size(11.0)
                        .color(Color32::GRAY),
                );
                TableView::show(ui, "query_result", cells, 320.0);
            }
            Some(QueryOutcome::Error(message)) => {
                egui::Frame::none()
                    .fill(Color32::from_rgb(255, 235, 238))
                    .rounding(5.0)
                    .inner_margin(8.0)
                    .show(ui, |ui| {
                        ui.label(RichText::new(message).color(Color32::from_rgb(220, 53, 69)));
                    });
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df! {
            "a" => [1i64, 2, 3, 4, 5, 6, 7],
            "b" => ["x", "y", "x", "y", "x", "y", "x"],
        }
        .unwrap()
    }

    #[test]
    fn default_query_shows_five_rows() {
        let mut panel = QueryPanel::new("SELECT * FROM data LIMIT 5");
        assert!(panel.outcome.is_none());

        panel.run(&sample_df(), "data");
        match &panel.outcome {
            Some(QueryOutcome::Table {
                rows,
                columns,
                cells,
            }) => {
                assert_eq!(*rows, 5);
                assert_eq!(*columns, 2);
                assert_eq!(cells.rows.len(), 5);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    #[test]
    fn failures_are_prefixed() {
        let mut panel = QueryPanel::new("SELECT nope FROM data");
        panel.run(&sample_df(), "data");
        match &panel.outcome {
            Some(QueryOutcome::Error(msg)) => {
                assert!(msg.starts_with("Error executing query: "))
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        panel.reset();
        assert!(panel.outcome.is_none());
    }
}
