//! Node wiring: a RocksDB store plus the scheduler over it.
//!
//! [`MintNode`] owns the database for its lifetime. Each operation builds a
//! short-lived [`Minter`] over the state and parameter column families, so
//! there is no cached copy of the counter to drift from what is on disk.

use std::fs;

use tracing::info;

use mintage_core::{Amount, KvParamStore, MintOutcome, Minter, ParamStore, Params, Schedule};

use crate::config::NodeConfig;
use crate::error::NodeError;
use crate::storage::{ColumnStore, RocksStore};

/// Scheduler bound to the node's column families.
pub type NodeMinter<'a> = Minter<ColumnStore<'a>, KvParamStore<ColumnStore<'a>>>;

/// A persistent mint module instance.
pub struct MintNode {
    store: RocksStore,
    config: NodeConfig,
}

impl MintNode {
    /// Open the database under `config.data_dir`, creating it if needed.
    ///
    /// On first open the genesis parameters from `config` are written to the
    /// parameter subspace. Later opens keep whatever is stored; the config's
    /// parameters are ignored once the subspace is initialized.
    pub fn open(config: NodeConfig) -> Result<Self, NodeError> {
        fs::create_dir_all(&config.data_dir)?;
        let store = RocksStore::open(config.db_path())?;

        let mut params = KvParamStore::new(store.params());
        if !params.is_initialized()? {
            params.set(config.params.clone())?;
            info!(
                denom = %config.params.mint_denom,
                total_supply = %config.params.total_supply,
                "wrote genesis mint parameters"
            );
        }

        info!(path = %config.db_path().display(), "mint store opened");
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    /// A scheduler over this node's state.
    pub fn minter(&self) -> NodeMinter<'_> {
        Minter::new(self.store.state(), KvParamStore::new(self.store.params()))
    }

    /// The stored parameter bundle.
    pub fn params(&self) -> Result<Params, NodeError> {
        Ok(self.minter().params()?)
    }

    /// Replace the stored parameter bundle. Invalid bundles are rejected and
    /// leave the store unchanged.
    pub fn set_params(&self, params: Params) -> Result<(), NodeError> {
        self.minter().set_params(params)?;
        info!("mint parameters updated");
        Ok(())
    }

    /// The schedule derived from the stored parameters.
    pub fn schedule(&self) -> Result<Schedule, NodeError> {
        let params = self.params()?;
        Ok(Schedule::new(&params)?)
    }

    /// Evaluate the block at `height` and persist the updated counter.
    pub fn step(&self, height: u64) -> Result<MintOutcome, NodeError> {
        let outcome = self.minter().begin_block(height)?;
        Ok(outcome)
    }

    /// Initialize the counter if absent and return it.
    pub fn init_remaining_supply(&self) -> Result<Amount, NodeError> {
        Ok(self.minter().remaining_supply()?)
    }

    /// The stored counter, or `None` if no block has been evaluated yet.
    pub fn remaining_supply(&self) -> Result<Option<Amount>, NodeError> {
        Ok(self.minter().peek_remaining_supply()?)
    }

    /// Flush the database to disk.
    pub fn flush(&self) -> Result<(), NodeError> {
        Ok(self.store.flush()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mintage_core::{MintError, ParamsError};

    fn test_config(dir: &tempfile::TempDir) -> NodeConfig {
        NodeConfig {
            data_dir: dir.path().to_path_buf(),
            params: Params::new("stake", 10_000, 100, 1_000, 90),
            ..NodeConfig::default()
        }
    }

    #[test]
    fn open_writes_genesis_params() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let node = MintNode::open(config.clone()).unwrap();
        assert_eq!(node.params().unwrap(), config.params);
        assert_eq!(node.remaining_supply().unwrap(), None);
    }

    #[test]
    fn step_mints_and_updates_counter() {
        let dir = tempfile::tempdir().unwrap();
        let node = MintNode::open(test_config(&dir)).unwrap();

        let outcome = node.step(0).unwrap();
        assert_eq!(outcome.minted, 1_000);
        assert_eq!(outcome.remaining, 9_000);
        assert_eq!(node.remaining_supply().unwrap(), Some(9_000));
    }

    #[test]
    fn init_remaining_supply_uses_total_supply() {
        let dir = tempfile::tempdir().unwrap();
        let node = MintNode::open(test_config(&dir)).unwrap();
        assert_eq!(node.init_remaining_supply().unwrap(), 10_000);
        assert_eq!(node.remaining_supply().unwrap(), Some(10_000));
    }

    #[test]
    fn set_params_rejects_invalid_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let node = MintNode::open(config.clone()).unwrap();

        let bad = Params {
            blocks_per_unit: 0,
            ..config.params.clone()
        };
        let err = node.set_params(bad).unwrap_err();
        assert!(matches!(
            err,
            NodeError::Mint(MintError::InvalidConfig(ParamsError::BlocksPerUnitTooSmall(0)))
        ));
        assert_eq!(node.params().unwrap(), config.params);
    }

    #[test]
    fn schedule_reflects_stored_params() {
        let dir = tempfile::tempdir().unwrap();
        let node = MintNode::open(test_config(&dir)).unwrap();
        let schedule = node.schedule().unwrap();
        assert_eq!(schedule.blocks_per_cycle(), 100);
        assert_eq!(schedule.cycle_amount(1).unwrap(), 900);
    }
}
