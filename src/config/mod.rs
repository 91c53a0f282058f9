// src/config/mod.rs
mod models;

pub use models::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Prefix for environment overrides, e.g. `UPTIME_MAX_TRIES=6`.
pub const ENV_PREFIX: &str = "UPTIME";

/// Load configuration from defaults, an optional file (YAML or JSON) and
/// `UPTIME_*` environment variables, in increasing precedence.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let mut builder = ::config::Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(::config::File::from(path).required(true));
    }

    builder = builder.add_source(
        ::config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("endpoints"),
    );

    let config: Config = builder
        .build()
        .context("Failed to read configuration sources")?
        .try_deserialize()
        .context("Failed to parse configuration")?;

    config.validate()?;
    Ok(config)
}
