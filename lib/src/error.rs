use polars::error::PolarsError;
use std::io::Error as IoError;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] IoError),

    #[error("Unsupported projections file (expected .csv or .parquet): {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("Counting stat {column} has negative value {value}")]
    NegativeCount { column: String, value: f64 },
}
