//! Economic parameters of the emission schedule.
//!
//! A [`Params`] bundle is immutable for the duration of one block's
//! evaluation. Each field is validated independently; there is no
//! cross-field invariant. The legacy inflation-targeting fields (min/max
//! inflation, goal bonded ratio, blocks per year) are not part of the
//! bundle because the decay schedule never consumed them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DECREASE_DENOMINATOR, DEFAULT_BLOCKS_PER_UNIT, DEFAULT_DECREASE, DEFAULT_MINT_DENOM,
    DEFAULT_TOTAL_SUPPLY, DEFAULT_UNIT_COIN, MAX_DENOM_LEN, MIN_DENOM_LEN,
};
use crate::error::ParamsError;

/// An amount of the minted denomination, in base units.
///
/// Signed so that a negative operator-supplied value survives parsing and is
/// rejected by validation with a precise error.
pub type Amount = i128;

/// Mint module parameters.
///
/// Amount fields serialize as decimal strings so values above `2^53` survive
/// JSON round trips unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Denomination of the minted coin.
    pub mint_denom: String,
    /// Fixed ceiling of mintable units.
    #[serde(with = "amount_serde")]
    pub total_supply: Amount,
    /// Number of blocks in one cycle.
    pub blocks_per_unit: i64,
    /// Per-block amount during cycle 0.
    #[serde(with = "amount_serde")]
    pub unit_coin: Amount,
    /// Decay numerator applied once per elapsed cycle, over
    /// [`DECREASE_DENOMINATOR`].
    #[serde(with = "amount_serde")]
    pub decrease: Amount,
}

impl Params {
    pub fn new(
        mint_denom: impl Into<String>,
        total_supply: Amount,
        blocks_per_unit: i64,
        unit_coin: Amount,
        decrease: Amount,
    ) -> Self {
        Self {
            mint_denom: mint_denom.into(),
            total_supply,
            blocks_per_unit,
            unit_coin,
            decrease,
        }
    }

    /// Validate every field. Returns the first failing rule.
    pub fn validate(&self) -> Result<(), ParamsError> {
        validate_mint_denom(&self.mint_denom)?;
        validate_total_supply(self.total_supply)?;
        validate_blocks_per_unit(self.blocks_per_unit)?;
        validate_unit_coin(self.unit_coin)?;
        validate_decrease(self.decrease)?;
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            mint_denom: DEFAULT_MINT_DENOM.to_string(),
            total_supply: DEFAULT_TOTAL_SUPPLY,
            blocks_per_unit: DEFAULT_BLOCKS_PER_UNIT,
            unit_coin: DEFAULT_UNIT_COIN,
            decrease: DEFAULT_DECREASE,
        }
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Minting Params:")?;
        writeln!(f, "  Mint Denom:       {}", self.mint_denom)?;
        writeln!(f, "  Total Supply:     {}", self.total_supply)?;
        writeln!(f, "  Blocks Per Unit:  {}", self.blocks_per_unit)?;
        writeln!(f, "  Unit Coin:        {}", self.unit_coin)?;
        write!(f, "  Decrease:         {}/{}", self.decrease, DECREASE_DENOMINATOR)
    }
}

/// Check that `denom` is non-blank and a syntactically valid denomination:
/// a lowercase ASCII letter followed by lowercase letters, digits or `/`,
/// between [`MIN_DENOM_LEN`] and [`MAX_DENOM_LEN`] characters in total.
pub fn validate_mint_denom(denom: &str) -> Result<(), ParamsError> {
    if denom.trim().is_empty() {
        return Err(ParamsError::BlankDenom);
    }

    let bytes = denom.as_bytes();
    let len_ok = (MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&bytes.len());
    let head_ok = bytes[0].is_ascii_lowercase();
    let tail_ok = bytes[1..]
        .iter()
        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'/');

    if len_ok && head_ok && tail_ok {
        Ok(())
    } else {
        Err(ParamsError::InvalidDenom(denom.to_string()))
    }
}

pub fn validate_total_supply(total_supply: Amount) -> Result<(), ParamsError> {
    if total_supply <= 0 {
        return Err(ParamsError::TotalSupplyTooSmall(total_supply));
    }
    Ok(())
}

pub fn validate_blocks_per_unit(blocks_per_unit: i64) -> Result<(), ParamsError> {
    if blocks_per_unit <= 0 {
        return Err(ParamsError::BlocksPerUnitTooSmall(blocks_per_unit));
    }
    Ok(())
}

pub fn validate_unit_coin(unit_coin: Amount) -> Result<(), ParamsError> {
    if unit_coin <= 0 {
        return Err(ParamsError::UnitCoinTooSmall(unit_coin));
    }
    Ok(())
}

/// `decrease` may be zero (the schedule stops after cycle 0) but never
/// negative. Values above [`DECREASE_DENOMINATOR`] are accepted and make the
/// per-cycle amount grow until the decay product overflows.
pub fn validate_decrease(decrease: Amount) -> Result<(), ParamsError> {
    if decrease < 0 {
        return Err(ParamsError::NegativeDecrease(decrease));
    }
    Ok(())
}

/// Serde adapter writing an [`Amount`] as a decimal string.
///
/// Accepts either a string or a native integer when reading, so hand-written
/// TOML such as `total_supply = -1` reaches validation instead of failing
/// to parse.
pub(crate) mod amount_serde {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S: Serializer>(value: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        deserializer.deserialize_any(AmountVisitor)
    }

    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = Amount;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a decimal integer string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
            Ok(Amount::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
            Ok(Amount::from(v))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<Amount, E> {
            Ok(v)
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<Amount, E> {
            Amount::try_from(v).map_err(|_| E::custom(format!("amount out of range: {v}")))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
            v.trim()
                .parse::<Amount>()
                .map_err(|e| E::custom(format!("invalid amount {v:?}: {e}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::COIN;

    fn valid() -> Params {
        Params::new("stake", 10_000, 100, 1_000, 90)
    }

    // ------------------------------------------------------------------
    // validate
    // ------------------------------------------------------------------

    #[test]
    fn valid_params_pass() {
        assert_eq!(valid().validate(), Ok(()));
    }

    #[test]
    fn default_params_pass() {
        assert_eq!(Params::default().validate(), Ok(()));
    }

    #[test]
    fn zero_blocks_per_unit_rejected() {
        let p = Params { blocks_per_unit: 0, ..valid() };
        assert_eq!(p.validate(), Err(ParamsError::BlocksPerUnitTooSmall(0)));
    }

    #[test]
    fn negative_blocks_per_unit_rejected() {
        let p = Params { blocks_per_unit: -5, ..valid() };
        assert_eq!(p.validate(), Err(ParamsError::BlocksPerUnitTooSmall(-5)));
    }

    #[test]
    fn negative_total_supply_rejected() {
        let p = Params { total_supply: -1, ..valid() };
        assert_eq!(p.validate(), Err(ParamsError::TotalSupplyTooSmall(-1)));
    }

    #[test]
    fn zero_total_supply_rejected() {
        let p = Params { total_supply: 0, ..valid() };
        assert_eq!(p.validate(), Err(ParamsError::TotalSupplyTooSmall(0)));
    }

    #[test]
    fn zero_unit_coin_rejected() {
        let p = Params { unit_coin: 0, ..valid() };
        assert_eq!(p.validate(), Err(ParamsError::UnitCoinTooSmall(0)));
    }

    #[test]
    fn zero_decrease_allowed() {
        let p = Params { decrease: 0, ..valid() };
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn negative_decrease_rejected() {
        let p = Params { decrease: -10, ..valid() };
        assert_eq!(p.validate(), Err(ParamsError::NegativeDecrease(-10)));
    }

    #[test]
    fn decrease_of_one_hundred_allowed() {
        let p = Params { decrease: 100, ..valid() };
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn decrease_above_one_hundred_allowed() {
        let p = Params { decrease: 110, ..valid() };
        assert_eq!(p.validate(), Ok(()));
    }

    #[test]
    fn first_failing_field_reported() {
        let p = Params::new("", -1, 0, 0, -1);
        assert_eq!(p.validate(), Err(ParamsError::BlankDenom));
    }

    // ------------------------------------------------------------------
    // validate_mint_denom
    // ------------------------------------------------------------------

    #[test]
    fn blank_denom_rejected() {
        assert_eq!(validate_mint_denom(""), Err(ParamsError::BlankDenom));
        assert_eq!(validate_mint_denom("   "), Err(ParamsError::BlankDenom));
    }

    #[test]
    fn denom_syntax() {
        for ok in ["stake", "uatom", "ibc/27394fb092", "abc"] {
            assert_eq!(validate_mint_denom(ok), Ok(()), "{ok} should be valid");
        }
        let too_long = "a".repeat(33);
        for bad in ["ab", "Stake", "1stake", "st ake", "stake!", too_long.as_str()] {
            assert!(
                matches!(validate_mint_denom(bad), Err(ParamsError::InvalidDenom(_))),
                "{bad} should be invalid"
            );
        }
    }

    // ------------------------------------------------------------------
    // serde
    // ------------------------------------------------------------------

    #[test]
    fn amounts_serialize_as_strings() {
        let json = serde_json::to_value(Params::default()).unwrap();
        assert_eq!(json["total_supply"], "21000000000000000000000000");
        assert_eq!(json["unit_coin"], COIN.to_string());
        assert_eq!(json["decrease"], "90");
        assert_eq!(json["blocks_per_unit"], 17_820);
    }

    #[test]
    fn amounts_accept_native_integers() {
        let json = r#"{"mint_denom":"stake","total_supply":-1,"blocks_per_unit":100,"unit_coin":"1000","decrease":90}"#;
        let p: Params = serde_json::from_str(json).unwrap();
        assert_eq!(p.total_supply, -1);
        assert_eq!(p.validate(), Err(ParamsError::TotalSupplyTooSmall(-1)));
    }

    #[test]
    fn malformed_amount_string_rejected() {
        let json = r#"{"mint_denom":"stake","total_supply":"lots","blocks_per_unit":100,"unit_coin":"1000","decrease":"90"}"#;
        assert!(serde_json::from_str::<Params>(json).is_err());
    }

    #[test]
    fn display_lists_every_field() {
        let text = valid().to_string();
        assert!(text.contains("Mint Denom:       stake"));
        assert!(text.contains("Total Supply:     10000"));
        assert!(text.contains("Blocks Per Unit:  100"));
        assert!(text.contains("Unit Coin:        1000"));
        assert!(text.contains("Decrease:         90/100"));
    }
}
