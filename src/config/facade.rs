//! Config loader facade: assembles sources in merge order and deserializes.

use crate::config::merge::builder_with_defaults;
use crate::config::sources::{env, global_file, workspace_file};
use crate::config::BillbriefConfig;
use crate::error::ConfigError;
use config::{File, FileFormat};
use std::path::{Path, PathBuf};

/// Loads [`BillbriefConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace: defaults, global file, workspace files,
    /// then environment overrides.
    pub fn load(workspace_root: &Path) -> Result<BillbriefConfig, ConfigError> {
        let builder = builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = env::add_to_builder(builder);

        let config: BillbriefConfig = builder.build()?.try_deserialize()?;
        Ok(Self::apply_fallbacks(config))
    }

    /// Load configuration from an explicit file. The file must exist; environment
    /// overrides still apply.
    pub fn load_from_file(path: &Path) -> Result<BillbriefConfig, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }
        let builder = builder_with_defaults()?.add_source(
            File::from(path.to_path_buf())
                .format(FileFormat::Toml)
                .required(true),
        );
        let builder = env::add_to_builder(builder);

        let config: BillbriefConfig = builder.build()?.try_deserialize()?;
        Ok(Self::apply_fallbacks(config))
    }

    /// Path of the global config file, if HOME or XDG_CONFIG_HOME is set.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    fn apply_fallbacks(mut config: BillbriefConfig) -> BillbriefConfig {
        if config.database.url.is_none() {
            config.database.url = env::database_url_fallback();
        }
        config
    }
}
