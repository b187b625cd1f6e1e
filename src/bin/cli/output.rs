//! Output Formatting and Display Functions
//!
//! Renders operation reports as colored text tables, JSON or YAML.

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{settings::Style as TableStyle, Table, Tabled};

use crate::cli::args::OutputFormat;
use helping_hand_rs::api::engine::{LinkReport, MoveReport, ObjectWarning, SelectionReport};
use helping_hand_rs::api::release::UpdateStatus;
use helping_hand_rs::detectors::rename::RenameReport;

/// Serialize a report for the machine-readable formats
pub fn render_structured<T: Serialize>(report: &T, format: OutputFormat) -> anyhow::Result<Option<String>> {
    match format {
        OutputFormat::Json => Ok(Some(serde_json::to_string_pretty(report)?)),
        OutputFormat::Yaml => Ok(Some(serde_yaml::to_string(report)?)),
        OutputFormat::Text => Ok(None),
    }
}

#[derive(Tabled)]
struct RenameRow {
    #[tabled(rename = "Original")]
    original: String,
    #[tabled(rename = "New Name")]
    renamed: String,
}

#[derive(Tabled)]
struct WarningRow {
    #[tabled(rename = "Object")]
    name: String,
    #[tabled(rename = "Problem")]
    detail: String,
}

fn warning_table(warnings: impl IntoIterator<Item = (String, String)>) -> String {
    let rows: Vec<WarningRow> = warnings
        .into_iter()
        .map(|(name, detail)| WarningRow { name, detail })
        .collect();
    let mut table = Table::new(rows);
    table.with(TableStyle::rounded());
    table.to_string()
}

fn print_object_warnings(warnings: &[ObjectWarning]) {
    if warnings.is_empty() {
        return;
    }
    println!("{}", "⚠️  Skipped objects:".yellow().bold());
    println!(
        "{}",
        warning_table(
            warnings
                .iter()
                .map(|w| (w.name.clone(), w.detail.clone()))
        )
    );
}

pub fn print_selection(report: &SelectionReport) {
    println!(
        "{} {} similar objects to '{}' by {}",
        "✅ Selected".bright_green().bold(),
        report.selected.len(),
        report.active.cyan(),
        report.method
    );
    for name in &report.selected {
        println!("   • {name}");
    }
}

pub fn print_rename(report: &RenameReport) {
    println!(
        "{} {} objects",
        "✅ Renamed".bright_green().bold(),
        report.renamed
    );
    if !report.applied.is_empty() {
        let rows: Vec<RenameRow> = report
            .applied
            .iter()
            .map(|(original, renamed)| RenameRow {
                original: original.clone(),
                renamed: renamed.clone(),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(TableStyle::rounded());
        println!("{table}");
    }
    if !report.warnings.is_empty() {
        println!("{}", "⚠️  Skipped objects:".yellow().bold());
        println!(
            "{}",
            warning_table(report.warnings.iter().map(|w| (
                w.name.clone(),
                format!("{:?} pass: {}", w.phase, w.detail)
            )))
        );
    }
}

pub fn print_move(report: &MoveReport) {
    println!(
        "{} {} objects to '{}'",
        "✅ Moved".bright_green().bold(),
        report.moved.len(),
        report.target.cyan()
    );
    print_object_warnings(&report.warnings);
}

pub fn print_link(report: &LinkReport) {
    println!(
        "{} data for {} objects to '{}'",
        "✅ Linked".bright_green().bold(),
        report.linked.len(),
        report.source.cyan()
    );
    print_object_warnings(&report.warnings);
}

pub fn print_update_status(status: &UpdateStatus, releases_url: &str) {
    if status.show_download() {
        println!("{} {}", "⬆️ ".bright_yellow(), status.message().bright_yellow().bold());
        println!("   Latest version: {}", status.latest().cyan());
        println!("   Download: {}", releases_url.underline());
    } else {
        println!("{} {}", "✅".green(), status.message().bright_green());
        println!("   Latest version: {}", status.latest().cyan());
    }
}
