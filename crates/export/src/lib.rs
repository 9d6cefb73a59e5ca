//! Export the row-level scoring result.
//!
//! The unified dataset plus the internal `__source_file`, `__risk_score`,
//! `__risk_level` and `__full_name` columns is turned into an Arrow
//! `RecordBatch` with per-column types, then written as CSV or as a Zstd
//! compressed Parquet file carrying run counts in its footer metadata.

mod builders;
mod error;
mod schema;
mod writer;


pub use error::ExportError;
pub use writer::{
    export_report, report_metadata, report_to_record_batch, write_csv, write_parquet,
    ExportFormat, FULL_NAME_COLUMN, RISK_LEVEL_COLUMN, RISK_SCORE_COLUMN, SOURCE_FILE_COLUMN,
};
