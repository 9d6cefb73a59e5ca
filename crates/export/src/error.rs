//! Error types for result export.

/// Errors that can occur while building or writing the result table.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Failed to build Arrow arrays from the scored rows.
    #[error("Arrow conversion error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Failed to write the Parquet file.
    #[error("Parquet write error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// I/O error when creating/writing the output file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown export format '{0}' (expected csv or parquet)")]
    UnknownFormat(String),
}
