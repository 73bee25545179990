//! Environment source: BILLBRIEF__SECTION__KEY variables.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub const ENV_PREFIX: &str = "BILLBRIEF";

/// Add environment overrides, e.g. `BILLBRIEF__BATCH__SIZE=20` or
/// `BILLBRIEF__CREDENTIALS__KEYS=k1,k2`.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .list_separator(",")
            .with_list_parse_key("credentials.keys")
            .try_parsing(true),
    )
}

/// Fallback for the database URL when configuration leaves it unset.
pub fn database_url_fallback() -> Option<String> {
    std::env::var("DATABASE_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
}
