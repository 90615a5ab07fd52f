//! # mintage-node
//! RocksDB storage, configuration, and node composition.
//!
//! Wires the emission scheduler to persistent storage:
//! - [`storage::RocksStore`]: column-family backed state and parameter stores
//! - [`node::MintNode`]: opens storage, seeds genesis parameters, runs blocks
//! - [`config::NodeConfig`]: node configuration (file + environment)

pub mod config;
pub mod error;
pub mod node;
pub mod storage;

pub use config::NodeConfig;
pub use error::NodeError;
pub use node::MintNode;
pub use storage::RocksStore;
