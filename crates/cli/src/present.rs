//! Text and JSON rendering of a scoring run.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use riskscore_core::RiskLevel;
use riskscore_rules::{IgnoredRule, QueryError, RiskProfile, ScoringReport};
use serde::Serialize;

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const HEADER: Color = Color::Magenta;
    const WARNING: Color = Color::Yellow;
    const ERROR: Color = Color::Red;
    const DIM: Color = Color::DarkGrey;
}

fn level_color(level: RiskLevel) -> Color {
    match level {
        RiskLevel::Critical => Color::Red,
        RiskLevel::High => Color::DarkYellow,
        RiskLevel::Medium => Color::Cyan,
        RiskLevel::Low => Color::Green,
    }
}

/// Rules whose activation is called out in the concise profile.
fn highlight(expression: &str) -> Option<&'static str> {
    if expression.starts_with("full_name in [") {
        Some("full_name in [...]")
    } else if expression == "duplicate(PolicyNumber)" {
        Some("duplicate(PolicyNumber)")
    } else if expression == "Age == 0" {
        Some("Age == 0")
    } else {
        None
    }
}

/// `1234567` → `1,234,567`.
pub fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Everything a run reports, as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub warnings: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watchlist_names: Option<usize>,
    pub rules_loaded: usize,
    pub report: ReportSummary<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<&'a RiskProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReportSummary<'a> {
    pub rows: usize,
    pub identities: usize,
    pub activations: &'a [riskscore_rules::Activation],
    pub ignored: &'a [IgnoredRule],
    pub name_source: Option<String>,
}

impl<'a> ReportSummary<'a> {
    pub fn new(report: &'a ScoringReport) -> Self {
        Self {
            rows: report.len(),
            identities: report.identities.len(),
            activations: &report.activations,
            ignored: &report.ignored,
            name_source: report.name_source.as_ref().map(ToString::to_string),
        }
    }
}

pub fn write_json(out: &mut impl Write, summary: &RunSummary<'_>) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, summary)?;
    writeln!(out)
}

/// Plain-text renderer. Colors are optional so output can be piped.
pub struct Presenter {
    color: bool,
    concise: bool,
}

impl Presenter {
    pub fn new(color: bool, concise: bool) -> Self {
        Self { color, concise }
    }

    fn colored(&self, out: &mut impl Write, color: Color, text: &str) -> io::Result<()> {
        if self.color {
            queue!(out, SetForegroundColor(color), Print(text), ResetColor)
        } else {
            out.write_all(text.as_bytes())
        }
    }

    pub fn warnings(&self, out: &mut impl Write, warnings: &[String]) -> io::Result<()> {
        if warnings.is_empty() {
            return Ok(());
        }
        self.colored(
            out,
            Colors::WARNING,
            &format!("Warnings while loading files ({}):\n", warnings.len()),
        )?;
        for warning in warnings {
            writeln!(out, "  - {warning}")?;
        }
        Ok(())
    }

    pub fn watchlist_loaded(&self, out: &mut impl Write, names: usize) -> io::Result<()> {
        writeln!(out, "Watchlist loaded: {names} names")
    }

    /// Rule counts, ignored rules and the activation list.
    pub fn summary(
        &self,
        out: &mut impl Write,
        rules_loaded: usize,
        report: &ScoringReport,
    ) -> io::Result<()> {
        writeln!(out, "Rules loaded: {rules_loaded} | Ignored: {}", report.ignored.len())?;
        for ignored in &report.ignored {
            self.colored(
                out,
                Colors::ERROR,
                &format!("[IGNORED] {} -> {}\n", ignored.expression, ignored.error),
            )?;
        }

        writeln!(out, "Activations:")?;
        for act in &report.activations {
            writeln!(
                out,
                " - {} (+{}) count={}",
                act.expression, act.weight, act.matched_rows
            )?;
        }
        Ok(())
    }

    pub fn profile(
        &self,
        out: &mut impl Write,
        profile: Result<&RiskProfile, &QueryError>,
    ) -> io::Result<()> {
        self.colored(out, Colors::HEADER, "\n=== RISK PROFILE ===\n")?;
        let profile = match profile {
            Ok(profile) => profile,
            Err(e) => return writeln!(out, "{e}"),
        };

        writeln!(out, "Name: {}", profile.full_name)?;
        writeln!(out, "Total Score: {}", group_thousands(profile.risk_score))?;
        write!(out, "Risk Level: ")?;
        self.colored(
            out,
            level_color(profile.risk_level),
            &profile.risk_level.to_string(),
        )?;
        writeln!(out)?;
        writeln!(out, "Records Found: {}", profile.records_count)?;

        if self.concise {
            self.concise_details(out, profile)
        } else {
            self.verbose_details(out, profile)
        }
    }

    fn concise_details(&self, out: &mut impl Write, profile: &RiskProfile) -> io::Result<()> {
        writeln!(out, "{} rules activated, including:", profile.rules.len())?;
        if let Some(wl) = profile.watchlist.as_ref().filter(|wl| wl.matched) {
            writeln!(out, "Watchlist match (variable score: +{} from watchlist)", wl.score)?;
        }

        let mut shown: Vec<&str> = Vec::new();
        for rule in &profile.rules {
            if let Some(label) = highlight(&rule.expression) {
                if !shown.contains(&label) {
                    writeln!(out, "{label} (+{})", rule.weight)?;
                    shown.push(label);
                }
            }
        }
        Ok(())
    }

    fn verbose_details(&self, out: &mut impl Write, profile: &RiskProfile) -> io::Result<()> {
        if let Some(wl) = &profile.watchlist {
            writeln!(out, "\nWatchlist:")?;
            if let Some(count) = profile.watchlist_count {
                writeln!(out, " - Names loaded: {count}")?;
            }
            writeln!(out, " - On watchlist: {}", if wl.matched { "Yes" } else { "No" })?;
            writeln!(out, " - Watchlist score: {}", wl.score)?;
            if !wl.reason.is_empty() {
                writeln!(out, " - Reason: {}", wl.reason)?;
            }
        }

        if !profile.records_breakdown.is_empty() {
            writeln!(out, "\nMatches per file:")?;
            for (file, count) in &profile.records_breakdown {
                writeln!(out, " - {file}: {count}")?;
            }
        }

        writeln!(out, "\nActivated Rules ({}):", profile.rules.len())?;
        for rule in &profile.rules {
            write!(out, "  • {} ", rule.expression)?;
            self.colored(out, Colors::DIM, &format!("→ +{}", rule.weight))?;
            writeln!(out)?;
        }
        Ok(())
    }
}
