//! Chart Panel
//! Chart type and column selectors, the interactive chart and PNG export.

use crate::charts::{ChartBuilder, ChartData, ChartKind, ChartPlotter, ChartRenderer, ChartSettings};
use crate::config::DashboardConfig;
use egui::{Color32, ComboBox, RichText};
use polars::prelude::*;
use std::ops::RangeInclusive;

const NO_COLOR: &str = "None";
const LABEL_WIDTH: f32 = 190.0;
const COMBO_WIDTH: f32 = 220.0;

pub struct ChartPanel {
    pub settings: ChartSettings,
    columns: Vec<String>,
    numeric: Vec<String>,
    bin_range: RangeInclusive<usize>,
    export_size: (u32, u32),
    /// Last built chart and the settings it was built from.
    cached: Option<(ChartSettings, Result<ChartData, String>)>,
    export_status: Option<String>,
}

impl ChartPanel {
    pub fn new(config: &DashboardConfig) -> Self {
        Self {
            settings: ChartSettings::new(config.default_bins),
            columns: Vec::new(),
            numeric: Vec::new(),
            bin_range: config.min_bins..=config.max_bins,
            export_size: (config.export_width, config.export_height),
            cached: None,
            export_status: None,
        }
    }

    /// New dataset loaded: refresh the dropdown options.
    pub fn set_columns(&mut self, columns: Vec<String>, numeric: Vec<String>) {
        self.columns = columns;
        self.numeric = numeric;
        self.settings
            .reconcile(&self.columns, &self.numeric, self.bin_range.clone());
        self.cached = None;
        self.export_status = None;
    }

    /// Chart for the current settings, rebuilt only when they changed.
    pub fn current_chart(&mut self, df: &DataFrame) -> &Result<ChartData, String> {
        let cached = match self.cached.take() {
            Some((built_for, result)) if built_for == self.settings => (built_for, result),
            _ => {
                let result = ChartBuilder::build(df, &self.settings).map_err(|e| e.to_string());
                if let Err(e) = &result {
                    tracing::debug!(error = %e, kind = ?self.settings.kind, "chart not drawable");
                }
                (self.settings.clone(), result)
            }
        };

        &self.cached.insert(cached).1
    }

    pub fn show(&mut self, ui: &mut egui::Ui, df: &DataFrame) {
        self.show_selectors(ui);
        self.settings
            .reconcile(&self.columns, &self.numeric, self.bin_range.clone());

        ui.add_space(10.0);

        let mut export_clicked = false;
        match self.current_chart(df) {
            Ok(chart) => {
                ChartPlotter::draw(ui, chart, 420.0);
                ui.add_space(5.0);
                if ui.button("💾 Export PNG").clicked() {
                    export_clicked = true;
                }
            }
            Err(message) => {
                ui.label(
                    RichText::new(format!("Cannot draw chart: {message}"))
                        .color(Color32::from_rgb(220, 53, 69)),
                );
            }
        }

        if export_clicked {
            self.handle_export_png();
        }

        if let Some(status) = &self.export_status {
            let color = if status.starts_with("Error") {
                Color32::from_rgb(220, 53, 69)
            } else {
                Color32::from_rgb(40, 167, 69)
            };
            ui.label(RichText::new(status).size(11.0).color(color));
        }
    }

    fn show_selectors(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Select Chart Type"));
            ComboBox::from_id_salt("chart_type")
                .width(COMBO_WIDTH)
                .selected_text(self.settings.kind.label())
                .show_ui(ui, |ui| {
                    for kind in ChartKind::ALL {
                        ui.selectable_value(&mut self.settings.kind, kind, kind.label());
                    }
                });
        });

        let x_options = self
            .settings
            .kind
            .x_options(&self.columns, &self.numeric)
            .to_vec();

        match self.settings.kind {
            ChartKind::Line | ChartKind::Bar => {
                column_combo(ui, "x_col", "Select X-axis column", &mut self.settings.x_col, &x_options);
                column_combo(ui, "y_col", "Select Y-axis column", &mut self.settings.y_col, &self.numeric);
            }
            ChartKind::Scatter => {
                column_combo(ui, "x_col", "Select X-axis column", &mut self.settings.x_col, &x_options);
                column_combo(ui, "y_col", "Select Y-axis column", &mut self.settings.y_col, &self.numeric);

                ui.horizontal(|ui| {
                    ui.add_sized(
                        [LABEL_WIDTH, 20.0],
                        egui::Label::new("Select Color column (optional)"),
                    );
                    let selected = self.settings.color_col.as_deref().unwrap_or(NO_COLOR).to_string();
                    ComboBox::from_id_salt("color_col")
                        .width(COMBO_WIDTH)
                        .selected_text(selected)
                        .show_ui(ui, |ui| {
                            ui.selectable_value(&mut self.settings.color_col, None, NO_COLOR);
                            for col in &self.columns {
                                ui.selectable_value(
                                    &mut self.settings.color_col,
                                    Some(col.clone()),
                                    col,
                                );
                            }
                        });
                });
            }
            ChartKind::Histogram => {
                column_combo(ui, "hist_col", "Select column", &mut self.settings.hist_col, &self.numeric);
                ui.horizontal(|ui| {
                    ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new("Number of bins"));
                    ui.add(egui::Slider::new(
                        &mut self.settings.bins,
                        self.bin_range.clone(),
                    ));
                });
            }
        }
    }

    /// Ask for a destination, render the current chart to PNG and open it.
    fn handle_export_png(&mut self) {
        let Some(Ok(chart)) = self.cached.as_ref().map(|(_, c)| c) else {
            self.export_status = Some("Error: no chart to export".to_string());
            return;
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("PNG Image", &["png"])
            .set_file_name("chart.png")
            .save_file()
        else {
            return; // User cancelled
        };

        let (width, height) = self.export_size;
        match ChartRenderer::save_png(chart, &path, width, height) {
            Ok(()) => {
                self.export_status = Some(format!("Saved {}", path.display()));
                if let Err(e) = open::that(&path) {
                    tracing::warn!(error = %e, "could not open exported chart");
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "chart export failed");
                self.export_status = Some(format!("Error: {e}"));
            }
        }
    }
}

/// Labelled dropdown over a list of column names.
fn column_combo(ui: &mut egui::Ui, id: &str, label: &str, selected: &mut String, options: &[String]) {
    ui.horizontal(|ui| {
        ui.add_sized([LABEL_WIDTH, 20.0], egui::Label::new(label));
        ComboBox::from_id_salt(id)
            .width(COMBO_WIDTH)
            .selected_text(selected.as_str())
            .show_ui(ui, |ui| {
                for col in options {
                    if ui.selectable_label(*selected == *col, col).clicked() {
                        *selected = col.clone();
                    }
                }
            });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df! {
            "city" => ["oslo", "rome", "lima"],
            "temp" => [3.0, 18.0, 21.0],
        }
        .unwrap()
    }

    fn loaded_panel(df: &DataFrame) -> ChartPanel {
        let mut panel = ChartPanel::new(&DashboardConfig::default());
        let columns = df.get_column_names().iter().map(|s| s.to_string()).collect();
        panel.set_columns(columns, vec!["temp".to_string()]);
        panel
    }

    #[test]
    fn defaults_follow_first_options() {
        let df = sample_df();
        let panel = loaded_panel(&df);
        assert_eq!(panel.settings.kind, ChartKind::Line);
        assert_eq!(panel.settings.x_col, "city");
        assert_eq!(panel.settings.y_col, "temp");
        assert_eq!(panel.settings.bins, 30);
    }

    #[test]
    fn chart_rebuilds_when_settings_change() {
        let df = sample_df();
        let mut panel = loaded_panel(&df);

        let line = panel.current_chart(&df).clone().unwrap();
        assert_eq!(line.series[0].points.len(), 3);

        panel.settings.kind = ChartKind::Histogram;
        panel.settings.bins = 5;
        let hist = panel.current_chart(&df).clone().unwrap();
        assert_eq!(hist.y_label, "count");
        assert_eq!(hist.series[0].points.len(), 5);
    }

    #[test]
    fn build_errors_are_kept_as_messages() {
        let df = sample_df();
        let mut panel = loaded_panel(&df);
        panel.settings.kind = ChartKind::Scatter;
        panel.settings.x_col = "city".into();
        let message = panel.current_chart(&df).clone().unwrap_err();
        assert!(message.contains("not numeric"));
    }
}
