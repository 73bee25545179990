//! Backlog status presentation.

use crate::bill::BillRecord;
use crate::cli::presentation::{format_section_heading, truncate_chars};
use crate::ordering::ordering_key;
use crate::store::ProgressStats;
use chrono::NaiveDate;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

const TITLE_WIDTH: usize = 40;

/// Backlog snapshot: counters plus the next bills in processing order.
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub cutoff: NaiveDate,
    pub backend: String,
    pub stats: ProgressStats,
    pub upcoming: Vec<BillRecord>,
}

pub fn format_status_text(report: &StatusReport) -> String {
    let stats = &report.stats;
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Summarization Progress")));
    out.push_str(&format!("  Cutoff: {}\n", report.cutoff));
    out.push_str(&format!("  Store: {}\n", report.backend));
    out.push_str(&format!("  Total bills: {}\n", stats.total));
    out.push_str(&format!(
        "  Summarized: {} ({:.1}%)\n",
        stats.processed,
        stats.processed_percent()
    ));
    out.push_str(&format!("  Not summarized: {}\n", stats.unprocessed));
    out.push_str(&format!("  Eligible now: {}\n\n", stats.eligible));

    out.push_str(&format!("{}\n\n", format_section_heading("Next in line")));
    if report.upcoming.is_empty() {
        out.push_str("  Nothing left to summarize.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["#", "Bill No", "Proposed", "Title"]);
    for (i, record) in report.upcoming.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            record.bill_no.clone(),
            record.proposal_date.to_string(),
            truncate_chars(&record.title, TITLE_WIDTH),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_status_json(report: &StatusReport) -> String {
    let upcoming: Vec<_> = report
        .upcoming
        .iter()
        .map(|record| {
            json!({
                "bill_id": record.bill_id,
                "bill_no": record.bill_no,
                "ordering_key": ordering_key(&record.bill_no),
                "proposal_date": record.proposal_date,
                "title": record.title,
            })
        })
        .collect();
    let out = json!({
        "cutoff": report.cutoff,
        "backend": report.backend,
        "total": report.stats.total,
        "processed": report.stats.processed,
        "unprocessed": report.stats.unprocessed,
        "eligible": report.stats.eligible,
        "processed_percent": report.stats.processed_percent(),
        "upcoming": upcoming,
    });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
