//! Run report presentation.

use crate::batch::RunReport;
use crate::cli::presentation::format_section_heading;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn format_run_report_text(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Run Report")));

    let termination = report.termination.to_string();
    let termination = if report.is_aborted() {
        termination.red().to_string()
    } else {
        termination.green().to_string()
    };
    out.push_str(&format!("  Termination: {}\n", termination));
    out.push_str(&format!("  Batches: {}\n", report.batches.len()));
    out.push_str(&format!("  Success: {}\n", report.success()));
    out.push_str(&format!("  Error: {}\n", report.error()));
    out.push_str(&format!("  Skipped: {}\n", report.skipped()));
    out.push_str(&format!("  Processed: {}\n", report.processed()));
    out.push_str(&format!("  Elapsed: {:.1}s\n", report.elapsed_secs));
    match report.seconds_per_record() {
        Some(avg) => out.push_str(&format!("  Average: {:.2}s per record\n", avg)),
        None => out.push_str("  Average: -\n"),
    }

    if !report.batches.is_empty() {
        out.push('\n');
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Batch", "Fetched", "Success", "Error", "Skipped", "Result", "Elapsed"]);
        for batch in &report.batches {
            table.add_row(vec![
                batch.batch_number.to_string(),
                batch.fetched.to_string(),
                batch.success.to_string(),
                batch.error.to_string(),
                batch.skipped.to_string(),
                batch.termination.to_string(),
                format!("{:.1}s", batch.elapsed_secs),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

pub fn format_run_report_json(report: &RunReport) -> String {
    let out = json!({
        "termination": report.termination,
        "aborted": report.is_aborted(),
        "success": report.success(),
        "error": report.error(),
        "skipped": report.skipped(),
        "processed": report.processed(),
        "elapsed_secs": report.elapsed_secs,
        "seconds_per_record": report.seconds_per_record(),
        "records_per_minute": report.records_per_minute(),
        "batches": report.batches,
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
