//! Node configuration for the Mintage node.
//!
//! [`NodeConfig`] carries the data directory, logging settings, and the
//! genesis parameter bundle written on first start. Values come from, in
//! increasing precedence: [`NodeConfig::default`], an optional TOML file, and
//! `MINTAGE_`-prefixed environment variables (`MINTAGE_LOG_LEVEL=debug`,
//! `MINTAGE_PARAMS__DECREASE=80`).

use std::path::{Path, PathBuf};

use mintage_core::Params;
use serde::Deserialize;

use crate::error::NodeError;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "MINTAGE";

/// Configuration for a node instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Root directory for all persistent data.
    pub data_dir: PathBuf,
    /// Log level filter string (e.g. "info", "debug", "mintage_core=trace").
    pub log_level: String,
    /// Log output format: "text" or "json".
    pub log_format: String,
    /// Parameters written to the store the first time it is opened.
    pub params: Params,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mintage");

        Self {
            data_dir,
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            params: Params::default(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from an optional TOML file layered under the
    /// environment. A missing `path` means environment and defaults only; a
    /// `path` that does not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, NodeError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build()?.try_deserialize::<NodeConfig>()?;
        config.params.validate().map_err(mintage_core::MintError::from)?;
        Ok(config)
    }

    /// Path to the RocksDB data directory.
    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("mintdata")
    }
}
