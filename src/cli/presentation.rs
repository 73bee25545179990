//! CLI presentation: text and json formatters per command.

mod history;
mod run;
mod status;

pub use history::{format_history_json, format_history_text};
pub use run::{format_run_report_json, format_run_report_text};
pub use status::{format_status_json, format_status_text, StatusReport};

use owo_colors::OwoColorize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Shorten to `max` characters, appending "..." when cut.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    format!("{}...", cut)
}
