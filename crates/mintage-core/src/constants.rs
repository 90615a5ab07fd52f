//! Module constants. All monetary values are in the smallest unit of the
//! minted denomination.

use crate::params::Amount;

/// Name of the mint module; also the root of its storage namespaces.
pub const MODULE_NAME: &str = "mint";

/// Namespace prefix for the module's private state.
pub const STATE_NAMESPACE: &[u8] = b"mint/";

/// Namespace prefix for the module's parameter subspace.
pub const PARAMS_NAMESPACE: &[u8] = b"params/mint/";

/// Storage key of the remaining supply counter within [`STATE_NAMESPACE`].
pub const KEY_NOW_TOTAL_SUPPLY: &[u8] = b"nowTotalSupply";

// --- Parameter keys ---

pub const KEY_MINT_DENOM: &[u8] = b"MintDenom";
pub const KEY_TOTAL_SUPPLY: &[u8] = b"TotalSupply";
pub const KEY_BLOCKS_PER_UNIT: &[u8] = b"BlocksPerUnit";
pub const KEY_UNIT_COIN: &[u8] = b"UnitCoin";
pub const KEY_DECREASE: &[u8] = b"Decrease";

/// Implicit divisor of the `decrease` factor: each cycle keeps
/// `decrease / DECREASE_DENOMINATOR` of the previous cycle's amount.
pub const DECREASE_DENOMINATOR: Amount = 100;

// --- Denomination syntax ---

/// Minimum length of a denomination token.
pub const MIN_DENOM_LEN: usize = 3;

/// Maximum length of a denomination token.
pub const MAX_DENOM_LEN: usize = 32;

// --- Genesis defaults ---

/// One whole coin in base units (18 decimals).
pub const COIN: Amount = 1_000_000_000_000_000_000;

/// Default denomination minted by the module.
pub const DEFAULT_MINT_DENOM: &str = "stake";

/// Default fixed ceiling: 21 million coins.
pub const DEFAULT_TOTAL_SUPPLY: Amount = 21_000_000 * COIN;

/// Default cycle length in blocks.
pub const DEFAULT_BLOCKS_PER_UNIT: i64 = 17_820;

/// Default per-block amount during cycle 0: one coin.
pub const DEFAULT_UNIT_COIN: Amount = COIN;

/// Default decay factor: each cycle mints 90% of the previous one.
pub const DEFAULT_DECREASE: Amount = 90;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_total_supply_is_21m_coins() {
        assert_eq!(DEFAULT_TOTAL_SUPPLY / COIN, 21_000_000);
    }

    #[test]
    fn default_decrease_decays() {
        assert!(DEFAULT_DECREASE > 0 && DEFAULT_DECREASE < DECREASE_DENOMINATOR);
    }

    #[test]
    fn namespaces_are_disjoint() {
        assert!(!STATE_NAMESPACE.starts_with(PARAMS_NAMESPACE));
        assert!(!PARAMS_NAMESPACE.starts_with(STATE_NAMESPACE));
    }
}
