//! Charts module - chart model, data building and rendering

mod builder;
mod model;
mod plotter;
mod renderer;

pub use builder::ChartBuilder;
pub use model::{format_number, ChartData, ChartKind, ChartSettings};
pub use plotter::ChartPlotter;
pub use renderer::ChartRenderer;
