//! Data source layer
//!
//! Readers load a tabular query result into a [`Dataset`]. The encoding
//! pipeline itself never touches files; readers are the only place where
//! input formats are known.
//!
//! # Example
//!
//! ```rust,ignore
//! use sunburst::reader::{FileReader, Reader};
//!
//! let dataset = FileReader::new().read(Path::new("sales.csv"))?;
//! ```

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::{Result, SunburstError};

pub mod data;

pub use data::{ColType, Dataset, Record, Scalar};

/// Trait for data source readers
pub trait Reader {
    /// Load the dataset stored at `path`
    ///
    /// # Errors
    ///
    /// Returns `SunburstError::ReaderError` if the format is unsupported or
    /// the content is malformed.
    fn read(&self, path: &Path) -> Result<Dataset>;
}

/// Reader choosing the format from the file extension.
///
/// - `.json` - query payload (`{"data": [...], "colnames": [...], "coltypes": [...]}`)
/// - `.csv` - CSV with header row (feature `csv`)
/// - `.parquet` - Parquet file (feature `parquet`)
#[derive(Debug, Default, Clone, Copy)]
pub struct FileReader;

impl FileReader {
    pub fn new() -> Self {
        Self
    }

    fn read_payload(path: &Path) -> Result<Dataset> {
        let text = std::fs::read_to_string(path)?;
        let payload: Value = serde_json::from_str(&text)?;
        Dataset::from_query_payload(&payload)
    }

    #[cfg(feature = "csv")]
    fn read_csv(path: &Path) -> Result<Dataset> {
        use polars::prelude::*;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()?;
        Dataset::from_dataframe(&df)
    }

    #[cfg(feature = "parquet")]
    fn read_parquet(path: &Path) -> Result<Dataset> {
        use polars::prelude::*;

        let file = std::fs::File::open(path)?;
        let df = ParquetReader::new(file).finish()?;
        Dataset::from_dataframe(&df)
    }
}

impl Reader for FileReader {
    fn read(&self, path: &Path) -> Result<Dataset> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        debug!(path = %path.display(), format = %extension, "reading dataset");

        let dataset = match extension.as_str() {
            "json" => Self::read_payload(path)?,
            #[cfg(feature = "csv")]
            "csv" => Self::read_csv(path)?,
            #[cfg(feature = "parquet")]
            "parquet" => Self::read_parquet(path)?,
            other => {
                return Err(SunburstError::ReaderError(format!(
                    "Unsupported data file extension '{}' for {}",
                    other,
                    path.display()
                )))
            }
        };

        debug!(rows = dataset.records.len(), "dataset loaded");
        Ok(dataset)
    }
}
