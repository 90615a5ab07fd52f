//! Error types for the Mintage emission schedule.
//!
//! Every failure is fatal to the block being processed: an invalid parameter
//! set or an unreadable counter would make replaying nodes diverge.
use thiserror::Error;

use crate::params::Amount;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    #[error("mint denom cannot be blank")] BlankDenom,
    #[error("invalid denom: {0}")] InvalidDenom(String),
    #[error("total supply too small: {0}")] TotalSupplyTooSmall(Amount),
    #[error("unit coin too small: {0}")] UnitCoinTooSmall(Amount),
    #[error("decrease cannot be negative: {0}")] NegativeDecrease(Amount),
    #[error("blocks per unit too small: {0}")] BlocksPerUnitTooSmall(i64),
    #[error("missing parameter: {0}")] Missing(&'static str),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("backend: {0}")] Backend(String),
    #[error("corrupt value under {key}: {reason}")] Corrupt { key: String, reason: String },
    #[error("encoding: {0}")] Encoding(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    #[error("invalid config: {0}")] InvalidConfig(#[from] ParamsError),
    #[error("storage fault: {0}")] StorageFault(#[from] StoreError),
    #[error("arithmetic overflow: {0}")] ArithmeticOverflow(&'static str),
}
