mod loader;

use std::time::Duration;

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};

use crate::cli::NodeArgs;
use crate::http::{DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RPC_URL, DEFAULT_UNCONFIRMED_TXS_LIMIT};

pub use loader::{LEGACY_RPC_URL_ENV, get_default_config, load_configuration, load_configuration_with_env, write_config_to};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Node RPC base URL, e.g. `http://localhost:26657`.
    pub rpc_url: String,
    pub request_timeout_secs: u64,
    /// Default `limit` for mempool queries.
    pub mempool_limit: i64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            mempool_limit: DEFAULT_UNCONFIRMED_TXS_LIMIT,
        }
    }
}

impl ViewerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            bail!("request_timeout_secs must be greater than 0");
        }
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded configuration.
    pub fn apply_node(&mut self, args: &NodeArgs) {
        if let Some(rpc_url) = &args.rpc_url {
            self.rpc_url = rpc_url.clone();
        }
        if let Some(timeout_secs) = args.timeout_secs {
            self.request_timeout_secs = timeout_secs;
        }
    }
}
