//! Run history presentation.

use crate::cli::presentation::format_section_heading;
use crate::journal::RunRecord;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde_json::json;

pub fn format_history_text(runs: &[RunRecord]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Recent Runs")));
    if runs.is_empty() {
        out.push_str("No runs recorded.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec![
        "Started", "Status", "Model", "Batches", "Success", "Error", "Result", "Elapsed",
    ]);
    for run in runs {
        let result = match (&run.termination, &run.failure) {
            (Some(termination), _) => termination.to_string(),
            (None, Some(failure)) => failure.clone(),
            (None, None) => "-".to_string(),
        };
        table.add_row(vec![
            run.started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            run.status.to_string(),
            run.settings.model.clone(),
            run.batches.to_string(),
            run.success.to_string(),
            run.error.to_string(),
            result,
            run.elapsed_secs()
                .map(|s| format!("{:.1}s", s))
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_history_json(runs: &[RunRecord]) -> String {
    let out = json!({ "runs": runs, "total": runs.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}
