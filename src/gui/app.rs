//! Data Dash Main Application
//! Single scrolling page: upload, overview, SQL query and visualization.

use crate::config::DashboardConfig;
use crate::data::{DataLoader, LoaderError};
use crate::gui::{ChartPanel, QueryPanel, TableCells, TableView};
use crate::stats::{column_info, DatasetOverview, StatsCalculator};
use egui::{Color32, RichText, ScrollArea};
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::thread;

/// Derived views of a freshly loaded dataset, computed once per load.
pub struct OverviewData {
    pub overview: DatasetOverview,
    pub sample: TableCells,
    pub summary: TableCells,
    pub info: String,
}

impl OverviewData {
    /// `None` when the loader holds no dataset.
    pub fn compute(loader: &DataLoader, sample_rows: usize) -> Option<Self> {
        let df = loader.get_dataframe()?;
        let sample = loader.head(sample_rows)?;
        Some(Self {
            overview: StatsCalculator::overview(df),
            sample: TableCells::from_dataframe(&sample, sample_rows),
            summary: TableCells::from_summary(&StatsCalculator::describe(df)),
            info: column_info(df),
        })
    }
}

/// CSV loading result from background thread
enum LoadResult {
    Progress(String),
    Complete {
        loader: DataLoader,
        overview: Box<OverviewData>,
    },
    Error(String),
}

/// Main application window.
pub struct DashboardApp {
    config: DashboardConfig,
    loader: DataLoader,
    overview: Option<OverviewData>,
    query_panel: QueryPanel,
    chart_panel: ChartPanel,
    status: String,

    // Async CSV loading
    load_rx: Option<Receiver<LoadResult>>,
    is_loading: bool,
}

impl DashboardApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: DashboardConfig) -> Self {
        Self::with_config(config)
    }

    fn with_config(config: DashboardConfig) -> Self {
        Self {
            query_panel: QueryPanel::new(&config.default_query),
            chart_panel: ChartPanel::new(&config),
            config,
            loader: DataLoader::new(),
            overview: None,
            status: "Upload a CSV file to begin".to_string(),
            load_rx: None,
            is_loading: false,
        }
    }

    /// Handle CSV file selection; parsing happens off the UI thread.
    fn handle_browse_csv(&mut self) {
        if self.is_loading {
            return; // Already loading
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .pick_file()
        else {
            return;
        };

        self.status = "Loading CSV file...".to_string();
        self.is_loading = true;

        let (tx, rx) = channel();
        self.load_rx = Some(rx);

        let infer_schema_length = self.config.infer_schema_length;
        let sample_rows = self.config.sample_rows;

        thread::spawn(move || {
            let _ = tx.send(LoadResult::Progress("Reading CSV file...".to_string()));

            let mut loader = DataLoader::new();
            if let Err(e) = loader.load_csv(&path, infer_schema_length) {
                tracing::error!(path = %path.display(), error = %e, "csv load failed");
                let _ = tx.send(LoadResult::Error(e.to_string()));
                return;
            }

            let _ = tx.send(LoadResult::Progress("Computing summary...".to_string()));
            let result = match OverviewData::compute(&loader, sample_rows) {
                Some(overview) => LoadResult::Complete {
                    loader,
                    overview: Box::new(overview),
                },
                None => LoadResult::Error(LoaderError::NoData.to_string()),
            };
            let _ = tx.send(result);
        });
    }

    /// Check for CSV loading results
    fn check_load_results(&mut self) {
        let Some(rx) = self.load_rx.take() else {
            return;
        };
        let mut should_keep_receiver = true;

        loop {
            let result = match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // worker exited without a final result
                    tracing::error!("csv loading thread stopped unexpectedly");
                    self.status = "Error: loading aborted".to_string();
                    self.is_loading = false;
                    should_keep_receiver = false;
                    break;
                }
            };

            match result {
                LoadResult::Progress(status) => {
                    self.status = status;
                }
                LoadResult::Complete { loader, overview } => {
                    self.loader = loader;
                    self.status = format!(
                        "Loaded {} rows, {} columns",
                        self.loader.get_row_count(),
                        overview.overview.columns
                    );
                    self.chart_panel.set_columns(
                        self.loader.get_columns(),
                        self.loader.get_numeric_columns(),
                    );
                    self.query_panel.reset();
                    self.overview = Some(*overview);
                    self.is_loading = false;
                    should_keep_receiver = false;
                    break;
                }
                LoadResult::Error(error) => {
                    self.status = format!("Error: {}", error);
                    self.is_loading = false;
                    should_keep_receiver = false;
                    break;
                }
            }
        }

        if should_keep_receiver {
            self.load_rx = Some(rx);
        }
    }

    /// Upload row; returns true when the browse button was clicked.
    fn show_upload(&self, ui: &mut egui::Ui) -> bool {
        let mut clicked = false;

        ui.label(RichText::new("Upload your CSV file").size(14.0).strong());
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.add_enabled_ui(!self.is_loading, |ui| {
                        if ui.button("📂 Browse files").clicked() {
                            clicked = true;
                        }
                    });

                    let file_name = self
                        .loader
                        .get_file_path()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file selected".to_string());
                    ui.label(RichText::new(file_name).size(12.0));

                    if self.is_loading {
                        ui.spinner();
                    }
                });
            });

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        clicked
    }
}

fn section_heading(ui: &mut egui::Ui, text: &str) {
    ui.add_space(15.0);
    ui.separator();
    ui.add_space(5.0);
    ui.label(RichText::new(text).size(18.0).strong());
    ui.add_space(5.0);
}

fn metric(ui: &mut egui::Ui, label: &str, value: usize) {
    ui.vertical(|ui| {
        ui.label(RichText::new(label).size(13.0).color(Color32::GRAY));
        ui.label(RichText::new(value.to_string()).size(30.0));
    });
}

fn show_overview(ui: &mut egui::Ui, data: &OverviewData) {
    ui.add_space(10.0);
    ui.columns(3, |cols| {
        metric(&mut cols[0], "Number of Rows", data.overview.rows);
        metric(&mut cols[1], "Number of Columns", data.overview.columns);
        metric(&mut cols[2], "Missing Values", data.overview.missing);
    });

    section_heading(ui, "Sample Data");
    TableView::show(ui, "sample_data", &data.sample, 220.0);

    section_heading(ui, "Data Summary");
    ui.columns(2, |cols| {
        cols[0].label("Numerical Columns Summary");
        if data.summary.headers.len() > 1 {
            TableView::show(&mut cols[0], "summary", &data.summary, 300.0);
        } else {
            cols[0].label(RichText::new("No numerical columns").italics());
        }

        cols[1].label("Columns Info");
        ScrollArea::both()
            .id_salt("column_info")
            .max_height(300.0)
            .show(&mut cols[1], |ui| {
                ui.label(RichText::new(&data.info).monospace().size(12.0));
            });
    });
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Check for background results
        self.check_load_results();

        // Request repaint while loading
        if self.is_loading {
            ctx.request_repaint();
        }

        let mut browse_clicked = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Interactive Data Analysis Dashboard")
                            .size(26.0)
                            .strong()
                            .color(Color32::from_rgb(100, 149, 237)),
                    );
                    ui.add_space(10.0);

                    browse_clicked = self.show_upload(ui);

                    let (Some(df), Some(overview)) =
                        (self.loader.get_dataframe(), self.overview.as_ref())
                    else {
                        return;
                    };

                    show_overview(ui, overview);

                    section_heading(ui, "SQL Query");
                    self.query_panel.show(ui, df, &self.config.table_name);

                    section_heading(ui, "Create Visualization");
                    self.chart_panel.show(ui, df);

                    ui.add_space(20.0);
                });
        });

        if browse_clicked {
            self.handle_browse_csv();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn loaded(content: &str) -> DataLoader {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let mut loader = DataLoader::new();
        loader.load_csv(file.path(), 100).unwrap();
        loader
    }

    #[test]
    fn overview_data_is_computed_once_per_load() {
        let loader = loaded("name,score\nann,1.0\n,2.0\ncid,\ndee,4.0\neve,5.0\nfay,6.0\n");

        let data = OverviewData::compute(&loader, 5).unwrap();
        assert_eq!(
            data.overview,
            DatasetOverview {
                rows: 6,
                columns: 2,
                missing: 2
            }
        );
        assert_eq!(data.sample.rows.len(), 5);
        assert_eq!(data.summary.headers, vec!["", "score"]);
        assert!(data.info.starts_with("DataFrame: 6 entries, 2 columns"));

        assert!(OverviewData::compute(&DataLoader::new(), 5).is_none());
    }

    #[test]
    fn completed_load_replaces_dataset() {
        let mut app = DashboardApp::with_config(DashboardConfig::default());
        let (tx, rx) = channel();
        app.load_rx = Some(rx);
        app.is_loading = true;

        let loader = loaded("a,b\n1,x\n2,y\n");
        let overview = Box::new(OverviewData::compute(&loader, 5).unwrap());
        tx.send(LoadResult::Complete { loader, overview }).unwrap();
        drop(tx);
        app.check_load_results();

        assert!(!app.is_loading);
        assert!(app.load_rx.is_none());
        assert_eq!(app.status, "Loaded 2 rows, 2 columns");
        assert_eq!(app.loader.get_row_count(), 2);
        assert!(app.overview.is_some());
    }

    #[test]
    fn dead_worker_ends_loading() {
        let mut app = DashboardApp::with_config(DashboardConfig::default());
        let (tx, rx) = channel();
        app.load_rx = Some(rx);
        app.is_loading = true;

        tx.send(LoadResult::Progress("Reading CSV file...".to_string()))
            .unwrap();
        app.check_load_results();
        assert!(app.is_loading);
        assert_eq!(app.status, "Reading CSV file...");

        drop(tx);
        app.check_load_results();
        assert!(!app.is_loading);
        assert!(app.load_rx.is_none());
        assert_eq!(app.status, "Error: loading aborted");
    }
}
