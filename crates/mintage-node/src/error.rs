//! Error type for the node layer.
use thiserror::Error;

use mintage_core::{MintError, StoreError};

#[derive(Error, Debug)]
pub enum NodeError {
    #[error(transparent)] Mint(#[from] MintError),
    #[error("config: {0}")] Config(#[from] ::config::ConfigError),
    #[error("io: {0}")] Io(#[from] std::io::Error),
}

impl From<StoreError> for NodeError {
    fn from(err: StoreError) -> Self {
        Self::Mint(MintError::StorageFault(err))
    }
}
