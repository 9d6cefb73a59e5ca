use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Dataset directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("No valid CSV files found in {}", .0.display())]
    NoValidFiles(PathBuf),

    #[error("Rules file not found: {}", .0.display())]
    RulesNotFound(PathBuf),

    #[error("Decode error: {0}")]
    Decode(String),
}

pub type Result<T> = std::result::Result<T, RiskError>;
