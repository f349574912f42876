//! CSV Data Loader Module
//! Handles CSV file loading and column extraction using Polars.

use crate::data::values::is_numeric_dtype;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("No data loaded")]
    NoData,
}

/// Cell values read as missing, besides empty fields.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Holds the uploaded dataset. Polars does the parsing.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Parse a CSV file into a DataFrame without touching loader state.
    ///
    /// Types are inferred from the first `infer_schema_length` rows. A value
    /// further down that does not fit triggers a rescan with the whole file
    /// used for inference, so no cell is dropped.
    pub fn read_csv(path: &Path, infer_schema_length: usize) -> Result<DataFrame, LoaderError> {
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = match Self::scan_csv(path, Some(infer_schema_length)) {
            Ok(df) => df,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "schema inference window too short, rescanning whole file"
                );
                Self::scan_csv(path, None)?
            }
        };

        tracing::info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "csv loaded"
        );
        Ok(df)
    }

    fn scan_csv(path: &Path, infer_schema_length: Option<usize>) -> PolarsResult<DataFrame> {
        let null_values: Vec<PlSmallStr> =
            NA_TOKENS.iter().map(|t| PlSmallStr::from(*t)).collect();

        LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(infer_schema_length)
            .with_null_values(Some(NullValues::AllColumns(null_values)))
            .finish()?
            .collect()
    }

    /// Load a CSV file and keep it as the current dataset.
    pub fn load_csv(
        &mut self,
        file_path: &Path,
        infer_schema_length: usize,
    ) -> Result<&DataFrame, LoaderError> {
        let df = Self::read_csv(file_path, infer_schema_length)?;
        self.file_path = Some(file_path.to_path_buf());
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get list of numeric column names.
    pub fn get_numeric_columns(&self) -> Vec<String> {
        let Some(df) = &self.df else {
            return Vec::new();
        };

        df.get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .map(|col| col.name().to_string())
            .collect()
    }

    /// First `n` rows of the dataset.
    pub fn head(&self, n: usize) -> Option<DataFrame> {
        self.df.as_ref().map(|df| df.head(Some(n)))
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.df = None;
        self.file_path = None;
    }
}
