mod cli;
mod present;

use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use riskscore_core::config::{load_dotenv, Config};
use riskscore_dataset::load_dir;
use riskscore_export::export_report;
use riskscore_rules::{load_rules, load_watchlist, query_name, RiskScorer, Watchlist};
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::present::{write_json, Presenter, ReportSummary, RunSummary};

fn main() -> ExitCode {
    // .env first so clap's env-backed flags can see it
    load_dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &CliArgs) -> Result<()> {
    let config = Config::from_env();
    config.log_summary();

    let loaded = load_dir(&args.dataset_dir, &config.dataset).with_context(|| {
        format!("failed to load dataset from {}", args.dataset_dir.display())
    })?;
    let rules = load_rules(&args.rules)
        .with_context(|| format!("failed to load rules from {}", args.rules.display()))?
        .exclude(&args.exclude_rules);
    let watchlist = match &args.watchlist {
        Some(path) => load_watchlist(path, &config.dataset)
            .with_context(|| format!("failed to load watchlist from {}", path.display()))?,
        None => Watchlist::default(),
    };

    let report = RiskScorer::new(&config.scoring).score(&loaded.dataset, &rules, &watchlist);
    let profile = args
        .query_name
        .as_deref()
        .map(|name| query_name(&report, name, &watchlist));

    let warnings = loaded.warnings();
    let watchlist_names = (!watchlist.is_empty()).then(|| watchlist.len());

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if args.json {
        let summary = RunSummary {
            warnings: &warnings,
            watchlist_names,
            rules_loaded: rules.len(),
            report: ReportSummary::new(&report),
            profile: profile.as_ref().and_then(|p| p.as_ref().ok()),
            query_error: profile
                .as_ref()
                .and_then(|p| p.as_ref().err())
                .map(ToString::to_string),
        };
        write_json(&mut out, &summary)?;
    } else {
        let presenter = Presenter::new(io::stdout().is_terminal(), args.concise_output);
        presenter.warnings(&mut out, &warnings)?;
        if let Some(names) = watchlist_names {
            presenter.watchlist_loaded(&mut out, names)?;
        }
        presenter.summary(&mut out, rules.len(), &report)?;
        if let Some(profile) = &profile {
            presenter.profile(&mut out, profile.as_ref())?;
        }
    }

    if let Some(path) = &args.export {
        let rows = export_report(&loaded.dataset, &report, path, args.export_format)
            .with_context(|| format!("failed to export results to {}", path.display()))?;
        info!(path = %path.display(), rows, format = %args.export_format, "exported results");
        if !args.json {
            writeln!(out, "Results exported to {}", path.display())?;
        }
    }

    out.flush()?;
    Ok(())
}
