//! Stats module - dataset overview, numeric summary and column info

mod info;
mod summary;

pub use info::column_info;
pub use summary::{DatasetOverview, StatsCalculator, SummaryTable};
