use std::path::PathBuf;

use clap::Parser;
use riskscore_export::ExportFormat;

/// Rule-based fraud/risk scoring over a directory of CSV files.
///
/// Loads every CSV in the dataset directory, evaluates the weighted rules
/// from a markdown pipe table, folds in an optional watchlist and prints
/// the activations and, when asked, one identity's risk profile.
#[derive(Parser, Debug)]
#[command(name = "riskscore", about = "Rule-based risk scoring engine")]
pub struct CliArgs {
    /// Directory of CSV files to unify
    #[arg(long, env = "RISKSCORE_DATASET_DIR", default_value = "dataset")]
    pub dataset_dir: PathBuf,

    /// Markdown file with the rules table (| expression | weight | description |)
    #[arg(long, env = "RISKSCORE_RULES", default_value = "rules_engine.md")]
    pub rules: PathBuf,

    /// Watchlist CSV (full_name, watchlist_score, reason)
    #[arg(long, env = "RISKSCORE_WATCHLIST")]
    pub watchlist: Option<PathBuf>,

    /// Full name to build a risk profile for
    #[arg(long)]
    pub query_name: Option<String>,

    /// Rule expression to drop before scoring (repeatable, exact match)
    #[arg(long = "exclude-rule", value_name = "EXPRESSION")]
    pub exclude_rules: Vec<String>,

    /// Write the scored rows to this path
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export format: csv or parquet
    #[arg(long, default_value = "csv")]
    pub export_format: ExportFormat,

    /// Only print the highlights of the risk profile
    #[arg(long)]
    pub concise_output: bool,

    /// Print the run summary and profile as JSON
    #[arg(long)]
    pub json: bool,
}
