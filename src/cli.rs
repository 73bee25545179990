//! CLI domain: parse, route, help, output, and presentation only.
//! No domain orchestration; single route table dispatches to domain services.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, RunArgs};
pub use presentation::{
    format_history_json, format_history_text, format_run_report_json, format_run_report_text,
    format_section_heading, format_status_json, format_status_text, StatusReport,
};
pub use route::{apply_run_overrides, status_report, RunContext};
