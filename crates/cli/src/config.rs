//! Configuration management for the CLI
//!
//! Settings are layered: the default config file, an explicit `--config`
//! file, `SDM_*` environment variables, then command-line flags.

use adapter_lib::{ResourceModel, TranslatorConfig};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Environment variable prefix, e.g. `SDM_PROJECT`
pub const ENV_PREFIX: &str = "SDM";

/// Values given on the command line, applied last
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project: Option<String>,
    pub cluster: Option<String>,
    pub location: Option<String>,
    pub resource_model: Option<ResourceModel>,
    pub window_secs: Option<u64>,
}

/// Load the translator configuration
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<TranslatorConfig> {
    load_from(default_config_path(), path, overrides)
}

/// Load the configuration with an explicit default file location
fn load_from(
    default_path: Option<PathBuf>,
    path: Option<&Path>,
    overrides: &Overrides,
) -> Result<TranslatorConfig> {
    let mut builder = config::Config::builder();

    if let Some(default_path) = default_path {
        builder = builder.add_source(config::File::from(default_path).required(false));
    }
    if let Some(path) = path {
        builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
    }

    builder = builder
        .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
        .set_override_option("project", overrides.project.clone())?
        .set_override_option("cluster", overrides.cluster.clone())?
        .set_override_option("location", overrides.location.clone())?
        .set_override_option(
            "resource_model",
            overrides.resource_model.map(|m| m.to_string()),
        )?
        .set_override_option("request_window_secs", overrides.window_secs)?;

    let config: TranslatorConfig = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Get the default configuration file path
fn default_config_path() -> Option<PathBuf> {
    let home = dirs_next::home_dir()?;
    Some(home.join(".config").join("sdm").join("config.toml"))
}
