//! Public API for writing the scored row table as CSV or Parquet.

use std::fs::File;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::format::KeyValue;
use riskscore_dataset::Dataset;
pub use riskscore_dataset::SOURCE_FILE_COLUMN;
use riskscore_rules::ScoringReport;
use tracing::debug;

use crate::builders::{build_array, int_array, string_array};
use crate::error::ExportError;
use crate::schema::column_type;

pub const RISK_SCORE_COLUMN: &str = "__risk_score";
pub const RISK_LEVEL_COLUMN: &str = "__risk_level";
pub const FULL_NAME_COLUMN: &str = "__full_name";

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Delimited text with a header row.
    #[default]
    Csv,
    /// Columnar binary, Zstd compressed.
    Parquet,
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "parquet" => Ok(ExportFormat::Parquet),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Csv => write!(f, "csv"),
            ExportFormat::Parquet => write!(f, "parquet"),
        }
    }
}

/// Convert the dataset plus its scores into one Arrow [`RecordBatch`].
///
/// Dataset columns keep their order; `__source_file`, `__risk_score`,
/// `__risk_level` and, when names were detected, `__full_name` follow.
pub fn report_to_record_batch(
    dataset: &Dataset,
    report: &ScoringReport,
) -> Result<RecordBatch, ExportError> {
    let mut fields = Vec::new();
    let mut arrays: Vec<ArrayRef> = Vec::new();

    for (name, values) in dataset.columns() {
        let data_type = column_type(values);
        arrays.push(build_array(values, &data_type));
        fields.push(Field::new(name, data_type, true));
    }

    fields.push(Field::new(SOURCE_FILE_COLUMN, DataType::Utf8, false));
    arrays.push(string_array(report.source_files.iter().map(String::as_str)));

    fields.push(Field::new(RISK_SCORE_COLUMN, DataType::Int64, false));
    arrays.push(int_array(&report.scores));

    let levels: Vec<String> = report.levels.iter().map(ToString::to_string).collect();
    fields.push(Field::new(RISK_LEVEL_COLUMN, DataType::Utf8, false));
    arrays.push(string_array(levels.iter().map(String::as_str)));

    if let Some(names) = &report.full_names {
        fields.push(Field::new(FULL_NAME_COLUMN, DataType::Utf8, false));
        arrays.push(string_array(names.iter().map(String::as_str)));
    }

    let batch = RecordBatch::try_new(Arc::new(Schema::new(fields)), arrays)?;
    Ok(batch)
}

fn create_file(path: &Path) -> Result<File, ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Write a batch as CSV with a header row. Returns the number of rows written.
pub fn write_csv(batch: &RecordBatch, path: &Path) -> Result<u64, ExportError> {
    let file = create_file(path)?;
    let mut writer = arrow::csv::WriterBuilder::new().with_header(true).build(file);
    writer.write(batch)?;

    debug!(path = %path.display(), rows = batch.num_rows(), "Wrote CSV file");
    Ok(batch.num_rows() as u64)
}

/// Write a batch to a Parquet file with Zstd compression, storing `metadata`
/// as key-value pairs in the file footer. Returns the number of rows written.
pub fn write_parquet(
    batch: &RecordBatch,
    path: &Path,
    metadata: &[(String, String)],
) -> Result<u64, ExportError> {
    let file = create_file(path)?;

    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(Default::default()))
        .set_key_value_metadata(Some(
            metadata
                .iter()
                .map(|(k, v)| KeyValue::new(k.clone(), Some(v.clone())))
                .collect(),
        ))
        .build();

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    debug!(path = %path.display(), rows = batch.num_rows(), "Wrote Parquet file");
    Ok(batch.num_rows() as u64)
}

/// Footer metadata describing a scoring run.
pub fn report_metadata(report: &ScoringReport) -> Vec<(String, String)> {
    let mut metadata = vec![
        ("riskscore.rows".to_string(), report.len().to_string()),
        (
            "riskscore.activations".to_string(),
            report.activations.len().to_string(),
        ),
        (
            "riskscore.ignored_rules".to_string(),
            report.ignored.len().to_string(),
        ),
        (
            "riskscore.identities".to_string(),
            report.identities.len().to_string(),
        ),
    ];
    if let Some(source) = &report.name_source {
        metadata.push(("riskscore.name_source".to_string(), source.to_string()));
    }
    metadata
}

/// Export the scored row table in `format`. Returns the number of rows written.
pub fn export_report(
    dataset: &Dataset,
    report: &ScoringReport,
    path: &Path,
    format: ExportFormat,
) -> Result<u64, ExportError> {
    let batch = report_to_record_batch(dataset, report)?;
    match format {
        ExportFormat::Csv => write_csv(&batch, path),
        ExportFormat::Parquet => write_parquet(&batch, path, &report_metadata(report)),
    }
}
