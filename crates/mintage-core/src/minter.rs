//! Per-block emission scheduler.
//!
//! [`Minter`] owns the remaining-supply counter. Each call derives the cycle
//! for the block height, decays the per-block amount, reconciles it against
//! the counter and writes the counter back. The write is the single commit
//! point: a call either returns an amount with the counter updated, or fails
//! before anything is written.
//!
//! The counter is lazily initialized to `total_supply` the first time it is
//! read. Absence is detected with `has()`; there is no in-band sentinel, so a
//! negative stored value is corruption, not "uninitialized".

use tracing::{debug, info};

use crate::constants::KEY_NOW_TOTAL_SUPPLY;
use crate::error::{MintError, StoreError};
use crate::param_store::ParamStore;
use crate::params::{Amount, Params};
use crate::schedule::{reconcile, Schedule};
use crate::store::KvStore;

/// Encoded width of the counter: a big-endian `i128`.
const COUNTER_LEN: usize = 16;

/// Result of evaluating one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintOutcome {
    /// Block height evaluated.
    pub height: u64,
    /// Cycle the height falls in.
    pub cycle: u64,
    /// Decayed per-block amount for the cycle, before reconciliation.
    pub cycle_amount: Amount,
    /// Amount to mint at this height. The caller credits it.
    pub minted: Amount,
    /// Counter value after this block.
    pub remaining: Amount,
}

impl MintOutcome {
    /// Whether every later height mints zero: the counter is drained, or the
    /// per-cycle amount decayed to zero (it never recovers from there).
    pub fn is_final(&self) -> bool {
        self.remaining == 0 || self.cycle_amount <= 0
    }
}

/// The emission scheduler.
///
/// `S` is the module's state store, already scoped to its namespace; `P`
/// supplies the parameter bundle for [`begin_block`](Self::begin_block).
pub struct Minter<S, P> {
    state: S,
    params: P,
}

impl<S: KvStore, P: ParamStore> Minter<S, P> {
    pub fn new(state: S, params: P) -> Self {
        Self { state, params }
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_parts(self) -> (S, P) {
        (self.state, self.params)
    }

    /// The current parameter bundle.
    pub fn params(&self) -> Result<Params, MintError> {
        self.params.get()
    }

    /// Replace the parameter bundle. An invalid bundle is rejected and the
    /// previous one stays in effect. The counter is not touched.
    pub fn set_params(&mut self, params: Params) -> Result<(), MintError> {
        self.params.set(params)
    }

    /// The counter as stored, without initializing it. `None` until the first
    /// evaluation or [`remaining_supply`](Self::remaining_supply) call.
    pub fn peek_remaining_supply(&self) -> Result<Option<Amount>, MintError> {
        if !self.state.has(KEY_NOW_TOTAL_SUPPLY)? {
            return Ok(None);
        }
        match self.state.get(KEY_NOW_TOTAL_SUPPLY)? {
            Some(bytes) => Ok(Some(decode_remaining(&bytes)?)),
            None => Ok(None),
        }
    }

    /// The counter, initializing it from the current parameters if absent.
    pub fn remaining_supply(&mut self) -> Result<Amount, MintError> {
        let params = self.params.get()?;
        self.load_or_init_remaining(params.total_supply)
    }

    /// Per-block entry point: load the parameters and evaluate `height`.
    pub fn begin_block(&mut self, height: u64) -> Result<MintOutcome, MintError> {
        let params = self.params.get()?;
        self.evaluate(height, &params)
    }

    /// Amount to mint at `height` under `params`. Updates the counter.
    ///
    /// # Errors
    ///
    /// - [`MintError::InvalidConfig`] if `params` fails validation (nothing is written)
    /// - [`MintError::ArithmeticOverflow`] if the decay product cannot be
    ///   represented (nothing is written)
    /// - [`MintError::StorageFault`] if the counter cannot be read or written
    pub fn compute_emission(&mut self, height: u64, params: &Params) -> Result<Amount, MintError> {
        Ok(self.evaluate(height, params)?.minted)
    }

    /// Like [`compute_emission`](Self::compute_emission), returning the full
    /// [`MintOutcome`].
    pub fn evaluate(&mut self, height: u64, params: &Params) -> Result<MintOutcome, MintError> {
        let schedule = Schedule::new(params)?;
        let cycle = schedule.cycle_of(height);
        let cycle_amount = schedule.cycle_amount(cycle)?;

        let before = self.load_or_init_remaining(params.total_supply)?;
        let (minted, remaining) = reconcile(cycle_amount, before);
        self.write_remaining(remaining)?;

        debug!(
            height,
            cycle,
            cycle_amount = %cycle_amount,
            minted = %minted,
            remaining = %remaining,
            "evaluated block emission"
        );
        if before > 0 && remaining == 0 {
            info!(height, "remaining supply exhausted");
        }

        Ok(MintOutcome {
            height,
            cycle,
            cycle_amount,
            minted,
            remaining,
        })
    }

    fn load_or_init_remaining(&mut self, total_supply: Amount) -> Result<Amount, MintError> {
        if let Some(remaining) = self.peek_remaining_supply()? {
            return Ok(remaining);
        }
        self.write_remaining(total_supply)?;
        info!(total_supply = %total_supply, "initialized remaining supply counter");
        Ok(total_supply)
    }

    fn write_remaining(&mut self, remaining: Amount) -> Result<(), MintError> {
        self.state
            .set(KEY_NOW_TOTAL_SUPPLY, &encode_remaining(remaining))?;
        Ok(())
    }
}

/// Encode a counter value as 16 big-endian bytes.
pub fn encode_remaining(remaining: Amount) -> [u8; COUNTER_LEN] {
    remaining.to_be_bytes()
}

/// Decode a stored counter value, rejecting wrong widths and negative values.
pub fn decode_remaining(bytes: &[u8]) -> Result<Amount, StoreError> {
    let raw: [u8; COUNTER_LEN] = bytes.try_into().map_err(|_| StoreError::Corrupt {
        key: counter_key(),
        reason: format!("invalid counter length: {}", bytes.len()),
    })?;
    let remaining = Amount::from_be_bytes(raw);
    if remaining < 0 {
        return Err(StoreError::Corrupt {
            key: counter_key(),
            reason: format!("negative remaining supply: {remaining}"),
        });
    }
    Ok(remaining)
}

fn counter_key() -> String {
    String::from_utf8_lossy(KEY_NOW_TOTAL_SUPPLY).into_owned()
}
