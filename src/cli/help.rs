//! CLI command-name contract for logging and the run journal.

use crate::cli::parse::Commands;

/// Command name string for log spans (e.g. "run", "status").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Run(_) => "run",
        Commands::Status { .. } => "status",
        Commands::History { .. } => "history",
        Commands::Config => "config",
    }
}
