#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use colored::Colorize;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use super::verdict::{Diagnostic, Level, Verdict};

#[derive(Tabled)]
/// One diagnostic, flattened for display
struct DiagnosticRow {
    #[tabled(rename = "Phase")]
    /// * `phase`: the phase that produced the diagnostic
    phase:    String,
    #[tabled(rename = "Status")]
    /// * `status`: `ok` or `FAIL`
    status:   String,
    #[tabled(rename = "Detail")]
    /// * `detail`: the diagnostic message
    detail:   String,
    #[tabled(rename = "Location")]
    /// * `location`: `file:line`, if the diagnostic points somewhere
    location: String,
}

impl From<&Diagnostic> for DiagnosticRow {
    fn from(d: &Diagnostic) -> Self {
        Self {
            phase:    d.phase.to_string(),
            status:   match d.level {
                Level::Info => "ok".to_string(),
                Level::Error => "FAIL".to_string(),
            },
            detail:   d.message.clone(),
            location: d
                .location
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
        }
    }
}

/// Renders the diagnostic trail of `verdict` as a table.
pub fn verdict_table(verdict: &Verdict) -> String {
    let rows: Vec<DiagnosticRow> = verdict.diagnostics().iter().map(DiagnosticRow::from).collect();
    let outcome = if verdict.is_pass() { "PASSED" } else { "FAILED" };

    Table::new(&rows)
        .with(Panel::header("Structure Check"))
        .with(Panel::footer(format!("Verdict: {outcome}")))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(48).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(
            Modify::new(Rows::last())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// One-line colored summary of `verdict`.
pub fn verdict_line(verdict: &Verdict) -> String {
    match verdict.failure() {
        None => format!("{}", "PASSED".green().bold()),
        Some(reason) => format!("{} {}", "FAILED".red().bold(), reason),
    }
}
