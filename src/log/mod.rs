pub mod structured_console_encoder;

use std::path::Path;

use anyhow::{Context, Result, bail};
use log::{debug, info};
use log4rs::{
    Config,
    config::{Deserializers, RawConfig},
};

use crate::log::structured_console_encoder::StructuredConsoleEncoderDeserializer;

const DEFAULT_LOG_CONFIG_PATH: &str = "log4rs.yml";

fn deserializers() -> Deserializers {
    let mut deserializers = Deserializers::default();
    deserializers.insert("structured_console", StructuredConsoleEncoderDeserializer);
    deserializers
}

/// Initializes logging.
///
/// Uses `config_path` if given, else `log4rs.yml` in the working directory if
/// it exists, else the embedded defaults.
pub fn init_logging(config_path: Option<&Path>) -> Result<()> {
    let path = config_path.unwrap_or_else(|| Path::new(DEFAULT_LOG_CONFIG_PATH));

    if path.exists() {
        log4rs::init_file(path, deserializers())
            .with_context(|| format!("Failed to load log configuration from {}", path.display()))?;
        info!(
            path:% = path.display();
            "Logging initialized from external configuration"
        );
        return Ok(());
    }
    if config_path.is_some() {
        bail!("Log configuration {} does not exist", path.display());
    }

    let config = embedded_config()?;
    log4rs::init_config(config).context("Failed to initialize logging from embedded config")?;

    debug!("Logging initialized from embedded defaults (no external log4rs.yml found)");
    Ok(())
}

fn embedded_config() -> Result<Config> {
    let yaml_content = include_str!("../../resources/default_log4rs.yml");
    let raw_config: RawConfig =
        serde_yaml::from_str(yaml_content).context("Embedded logging configuration is invalid YAML")?;

    let (appenders, errors) = raw_config.appenders_lossy(&deserializers());
    if !errors.is_empty() {
        bail!("Errors parsing embedded appenders: {:?}", errors);
    }

    Config::builder()
        .appenders(appenders)
        .loggers(raw_config.loggers())
        .build(raw_config.root())
        .context("Failed to build logging config")
}
