//! Dataset unifier: loads a directory of heterogeneous CSV files into one
//! typed, column-oriented table.
//!
//! - Ordered encoding fallback per file (UTF-8, then ISO-8859-1)
//! - Malformed records are skipped, the rest of the file survives
//! - Per-file column type inference (integer, float, boolean, text)
//! - Column-union concatenation with per-row provenance

pub mod encoding;
pub mod infer;
pub mod loader;
pub mod reader;
pub mod table;

pub use loader::{load_dir, read_frame, LoadResult, LoadStatus, LoadedDataset};
pub use table::{Dataset, Frame, SOURCE_FILE_COLUMN};
