//! Shared test helpers for the integration tests.

use mintage_core::constants::STATE_NAMESPACE;
use mintage_core::{Amount, FixedParams, MemoryStore, MintOutcome, Minter, Params, Prefixed};
use mintage_node_lib::{MintNode, NodeConfig};

/// In-memory scheduler over a namespaced store.
pub type MemoryMinter = Minter<Prefixed<MemoryStore>, FixedParams>;

/// Parameters shared by the worked scenarios: 1000 per block, 90% decay,
/// 100-block cycles.
pub fn scenario_params(total_supply: Amount) -> Params {
    Params::new("stake", total_supply, 100, 1_000, 90)
}

/// A fresh in-memory scheduler for `params`.
pub fn memory_minter(params: &Params) -> MemoryMinter {
    let fixed = FixedParams::new(params.clone()).unwrap();
    Minter::new(Prefixed::new(MemoryStore::new(), STATE_NAMESPACE), fixed)
}

/// Evaluate every height in `heights` in order, collecting the outcomes.
pub fn run_heights(
    minter: &mut MemoryMinter,
    heights: impl IntoIterator<Item = u64>,
) -> Vec<MintOutcome> {
    heights
        .into_iter()
        .map(|h| minter.begin_block(h).unwrap())
        .collect()
}

/// Sum of the minted amounts.
pub fn total_minted(outcomes: &[MintOutcome]) -> Amount {
    outcomes.iter().map(|o| o.minted).sum()
}

/// A RocksDB-backed node in a fresh temp directory.
pub fn temp_node(params: Params) -> (MintNode, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = NodeConfig {
        data_dir: dir.path().to_path_buf(),
        params,
        ..NodeConfig::default()
    };
    let node = MintNode::open(config).unwrap();
    (node, dir)
}
