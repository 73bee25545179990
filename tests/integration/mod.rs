//! Integration tests for the billbrief summarization pipeline

mod cli_routes;
mod config_integration;
mod credential_discovery;
mod journal_integration;
mod pacing_rules;
mod test_utils;
