//! GUI module - User interface components

mod app;
mod chart_panel;
mod query_panel;
mod table_view;

pub use app::DashboardApp;
pub use chart_panel::ChartPanel;
pub use query_panel::QueryPanel;
pub use table_view::{TableCells, TableView};
