//! Data module - CSV loading, SQL queries and value helpers

mod loader;
mod query;
pub mod values;

pub use loader::{DataLoader, LoaderError};
pub use query::QueryRunner;
