//! Merge rules: defaults and override order.
//!
//! Later sources win: defaults, global file, workspace files, environment.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("generation.model", crate::config::DEFAULT_MODEL)?
        .set_default("batch.size", 50_i64)?
        .set_default("batch.cutoff_date", "2025-01-01")
}
