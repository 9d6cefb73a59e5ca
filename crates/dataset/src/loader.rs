//! Directory loader: reads every `*.csv` file and unifies them into a [`Dataset`].

use std::fs;
use std::path::{Path, PathBuf};

use riskscore_core::config::{DatasetConfig, TextEncoding};
use riskscore_core::RiskError;
use tracing::{debug, info, warn};

use crate::encoding::decode;
use crate::infer::build_column;
use crate::reader::{parse_csv, RawTable};
use crate::table::{Dataset, Frame};

/// Outcome of loading a single dataset file.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub path: PathBuf,
    pub status: LoadStatus,
}

impl LoadResult {
    pub fn file_name(&self) -> String {
        file_name(&self.path)
    }
}

/// Status of a single file load attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus {
    /// File decoded and contributed rows.
    Loaded {
        rows: usize,
        encoding: TextEncoding,
        skipped_lines: usize,
    },
    /// Not a CSV file.
    Skipped { reason: String },
    /// Unreadable under every encoding, or no data rows.
    Failed { error: String },
}

/// The unified dataset plus the per-file load report.
#[derive(Debug, Clone)]
pub struct LoadedDataset {
    pub dataset: Dataset,
    pub results: Vec<LoadResult>,
}

impl LoadedDataset {
    /// `"<file>: <error>"` for every file that was excluded.
    pub fn warnings(&self) -> Vec<String> {
        self.results
            .iter()
            .filter_map(|r| match &r.status {
                LoadStatus::Failed { error } => Some(format!("{}: {}", r.file_name(), error)),
                _ => None,
            })
            .collect()
    }
}

/// A decoded file and how it was decoded.
#[derive(Debug, Clone)]
pub struct FileRead {
    pub frame: Frame,
    pub encoding: TextEncoding,
    pub skipped_lines: usize,
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn build_frame(raw: RawTable, config: &DatasetConfig) -> Frame {
    let columns = raw
        .header
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<&str>> = raw
                .records
                .iter()
                .map(|record| record.get(idx).and_then(|c| c.as_deref()))
                .collect();
            (name.clone(), build_column(&cells, config))
        })
        .collect();

    Frame {
        columns,
        rows: raw.records.len(),
    }
}

/// Read one CSV file, trying each configured encoding in order.
///
/// Returns the error of the last attempt when every encoding fails.
pub fn read_file(path: &Path, config: &DatasetConfig) -> Result<FileRead, RiskError> {
    let bytes = fs::read(path)?;
    let mut last_error = None;

    for &encoding in &config.encodings {
        match decode(&bytes, encoding).and_then(|text| parse_csv(&text)) {
            Ok(raw) => {
                let skipped_lines = raw.skipped;
                return Ok(FileRead {
                    frame: build_frame(raw, config),
                    encoding,
                    skipped_lines,
                });
            }
            Err(e) => {
                debug!(path = %path.display(), %encoding, error = %e, "decode attempt failed");
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| RiskError::Decode("no encodings configured".to_string())))
}

/// Read one CSV file into a [`Frame`].
pub fn read_frame(path: &Path, config: &DatasetConfig) -> Result<Frame, RiskError> {
    read_file(path, config).map(|read| read.frame)
}

/// Load every `*.csv` file in `dir` (sorted by name) into one [`Dataset`].
///
/// Unreadable or empty files are excluded and reported in the results.
/// Fails only when the directory is missing or no file survives.
pub fn load_dir(dir: &Path, config: &DatasetConfig) -> Result<LoadedDataset, RiskError> {
    if !dir.is_dir() {
        return Err(RiskError::DirectoryNotFound(dir.to_path_buf()));
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file())
        .collect();
    paths.sort();

    let mut frames = Vec::new();
    let mut results = Vec::with_capacity(paths.len());

    for path in paths {
        if !is_csv(&path) {
            results.push(LoadResult {
                path,
                status: LoadStatus::Skipped {
                    reason: "not a CSV file".to_string(),
                },
            });
            continue;
        }

        let name = file_name(&path);
        let status = match read_file(&path, config) {
            Ok(read) if read.frame.is_empty() => {
                warn!(file = %name, "dataset file has no data rows");
                LoadStatus::Failed {
                    error: "empty file".to_string(),
                }
            }
            Ok(read) => {
                info!(
                    file = %name,
                    rows = read.frame.rows,
                    encoding = %read.encoding,
                    skipped_lines = read.skipped_lines,
                    "loaded dataset file"
                );
                let status = LoadStatus::Loaded {
                    rows: read.frame.rows,
                    encoding: read.encoding,
                    skipped_lines: read.skipped_lines,
                };
                frames.push((name, read.frame));
                status
            }
            Err(e) => {
                warn!(file = %name, error = %e, "failed to read dataset file");
                LoadStatus::Failed {
                    error: e.to_string(),
                }
            }
        };
        results.push(LoadResult { path, status });
    }

    if frames.is_empty() {
        return Err(RiskError::NoValidFiles(dir.to_path_buf()));
    }

    let dataset = Dataset::concat(frames);
    info!(
        rows = dataset.len(),
        columns = dataset.column_names().count(),
        "unified dataset"
    );

    Ok(LoadedDataset { dataset, results })
}
