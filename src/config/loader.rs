use std::{fs, fs::File, io::Write, path::Path};

use anyhow::{Context, Result};
use config::{Config, Environment};
use log::{info, trace};

use super::ViewerConfig;

/// Environment variable honoured for the base URL alongside `TMVIEW_RPC_URL`.
pub const LEGACY_RPC_URL_ENV: &str = "PLT_RPC_URL";

const ENV_PREFIX: &str = "TMVIEW";

pub fn get_default_config() -> &'static str {
    include_str!("../../config/config.toml")
}

/// Loads configuration from the process environment and an optional file.
pub fn load_configuration(path: Option<&Path>) -> Result<ViewerConfig> {
    load_configuration_with_env(path, std::env::vars().collect())
}

/// Loads configuration with an explicit environment.
///
/// Precedence, lowest first: built-in defaults, the TOML file at `path`,
/// [`LEGACY_RPC_URL_ENV`], then `TMVIEW_*` variables.
pub fn load_configuration_with_env(path: Option<&Path>, env: config::Map<String, String>) -> Result<ViewerConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        let filename = path.to_str().context("Invalid config file path")?;
        builder = builder.add_source(config::File::with_name(filename).required(true));
        info!(path:% = path.display(); "Loading configuration file");
    }

    let has_rpc_url_var = env.contains_key(&format!("{ENV_PREFIX}_RPC_URL"));
    if let Some(legacy_url) = env.get(LEGACY_RPC_URL_ENV).filter(|_| !has_rpc_url_var) {
        trace!("Using {LEGACY_RPC_URL_ENV} for rpc_url");
        builder = builder
            .set_override("rpc_url", legacy_url.as_str())
            .context("Could not override rpc_url")?;
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(Some(env)),
    );

    let config: ViewerConfig = builder
        .build()
        .context("Could not build configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;
    config.validate()?;

    Ok(config)
}

pub fn write_config_to(path: &Path, source: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create parent directories")?;
    };

    let mut file = File::create(path).context("Failed to create config file")?;
    file.write_all(source.as_bytes())
        .context("Failed to write config content")?;
    file.write_all(b"\n").context("Failed to write newline")?;
    Ok(())
}
