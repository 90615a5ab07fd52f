//! Cycle decay schedule.
//!
//! The per-block amount starts at `unit_coin` and is multiplied by
//! `decrease / 100` once per completed cycle of `blocks_per_unit` blocks:
//!
//! - Cycle 0 (heights `0..B`): `unit_coin` per block
//! - Cycle 1 (heights `B..2B`): `unit_coin * decrease / 100`
//! - Cycle n: the cycle n-1 amount times `decrease / 100`, truncated
//!
//! The truncation happens once per cycle. A closed form such as
//! `unit_coin * decrease^n / 100^n` truncates once overall and drifts from
//! the iterative result once several cycles have elapsed, so the iterative
//! form is the definition. Every function here is pure; the persisted
//! remaining-supply counter lives in [`Minter`](crate::minter::Minter).
//!
//! A `decrease` above 100 makes the amount grow each cycle. Every product is
//! checked, and a cycle whose amount cannot be represented is an
//! [`MintError::ArithmeticOverflow`], as is every cycle after it.

use crate::constants::DECREASE_DENOMINATOR;
use crate::error::MintError;
use crate::params::{Amount, Params};

/// Label carried by the overflow error of a per-cycle decay step.
pub const DECAY_OVERFLOW: &str = "cycle amount * decrease";

/// A validated view of the schedule-relevant parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Schedule {
    blocks_per_cycle: u64,
    unit_coin: Amount,
    decrease: Amount,
    total_supply: Amount,
}

impl Schedule {
    /// Build a schedule from `params`.
    ///
    /// # Errors
    ///
    /// - [`MintError::InvalidConfig`] if `params` fails validation
    /// - [`MintError::ArithmeticOverflow`] if `unit_coin * decrease` does not
    ///   fit in an [`Amount`]. With `decrease <= 100` every later decay
    ///   product is bounded by this one.
    pub fn new(params: &Params) -> Result<Self, MintError> {
        params.validate()?;
        params
            .unit_coin
            .checked_mul(params.decrease)
            .ok_or(MintError::ArithmeticOverflow("unit_coin * decrease"))?;

        Ok(Self {
            // Positive after validation.
            blocks_per_cycle: params.blocks_per_unit as u64,
            unit_coin: params.unit_coin,
            decrease: params.decrease,
            total_supply: params.total_supply,
        })
    }

    pub fn blocks_per_cycle(&self) -> u64 {
        self.blocks_per_cycle
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Whether the per-cycle amount grows instead of decaying.
    pub fn is_growing(&self) -> bool {
        self.decrease > DECREASE_DENOMINATOR
    }

    /// Which cycle a block height falls in.
    pub fn cycle_of(&self, height: u64) -> u64 {
        height / self.blocks_per_cycle
    }

    /// The first block height of `cycle`. Saturates at `u64::MAX`.
    pub fn cycle_start_height(&self, cycle: u64) -> u64 {
        cycle.saturating_mul(self.blocks_per_cycle)
    }

    /// One decay step: `amount * decrease / 100`, truncated.
    fn decay(&self, amount: Amount) -> Result<Amount, MintError> {
        amount
            .checked_mul(self.decrease)
            .map(|product| product / DECREASE_DENOMINATOR)
            .ok_or(MintError::ArithmeticOverflow(DECAY_OVERFLOW))
    }

    /// The per-block amount during `cycle`, before reconciliation against the
    /// remaining supply.
    ///
    /// Applies [`decay`](Self::decay) exactly `cycle` times. Stops early once a
    /// step no longer changes the amount: the step is a function of the amount
    /// alone, so every further step is then the identity. That covers an
    /// amount that reached zero, `decrease == 100`, and a small amount that a
    /// growing schedule truncates back to itself.
    ///
    /// # Errors
    ///
    /// [`MintError::ArithmeticOverflow`] if a growing amount overflows on the
    /// way to `cycle`.
    pub fn cycle_amount(&self, cycle: u64) -> Result<Amount, MintError> {
        let mut amount = self.unit_coin;
        for _ in 0..cycle {
            let next = self.decay(amount)?;
            if next == amount {
                break;
            }
            amount = next;
        }
        Ok(amount)
    }

    /// The per-block amount at `height`.
    pub fn block_amount(&self, height: u64) -> Result<Amount, MintError> {
        self.cycle_amount(self.cycle_of(height))
    }

    /// The first height of the cycle after the one containing `height`.
    ///
    /// `None` if the amount at `height` is already zero (nothing left to
    /// decay) or the next cycle starts beyond `u64::MAX`.
    pub fn next_decay_height(&self, height: u64) -> Result<Option<u64>, MintError> {
        if self.block_amount(height)? == 0 {
            return Ok(None);
        }
        Ok(self
            .cycle_of(height)
            .checked_add(1)
            .and_then(|next| next.checked_mul(self.blocks_per_cycle)))
    }

    /// Blocks remaining from `height` until the next cycle boundary.
    ///
    /// `None` under the same conditions as
    /// [`next_decay_height`](Self::next_decay_height).
    pub fn blocks_until_decay(&self, height: u64) -> Result<Option<u64>, MintError> {
        Ok(self.next_decay_height(height)?.map(|next| next - height))
    }

    /// The last cycle whose per-block amount is non-zero.
    ///
    /// Returns `None` when the amount never reaches zero: `decrease` is 100
    /// or more, or the amount settles on a non-zero fixed point. Only the
    /// supply ceiling ends emission then.
    pub fn last_emitting_cycle(&self) -> Option<u64> {
        if self.decrease >= DECREASE_DENOMINATOR {
            return None;
        }
        let mut amount = self.unit_coin;
        let mut cycle = 0u64;
        loop {
            // Below 100 the product never exceeds the one checked in `new`.
            let next = amount * self.decrease / DECREASE_DENOMINATOR;
            if next == 0 {
                return Some(cycle);
            }
            if next == amount {
                return None;
            }
            amount = next;
            cycle += 1;
        }
    }

    /// Total the scheduler mints over heights `0..=height`, starting from a
    /// fresh counter of `total_supply` and evaluating every height once.
    ///
    /// Computed per cycle rather than per block: within a cycle each block
    /// mints `min(amount, remaining)`, so a run of `n` blocks mints
    /// `min(n * amount, remaining)`. Once the amount stops changing the rest
    /// of the range is a single run.
    ///
    /// # Errors
    ///
    /// [`MintError::ArithmeticOverflow`] if the amount of the cycle containing
    /// `height` overflows. Block-by-block evaluation fails there too, whether
    /// or not the ceiling was already reached.
    pub fn projected_emission(&self, height: u64) -> Result<Amount, MintError> {
        let final_cycle = self.cycle_of(height);
        self.cycle_amount(final_cycle)?;

        let mut remaining = self.total_supply;
        let mut minted: Amount = 0;
        let mut amount = self.unit_coin;
        let mut cycle = 0u64;

        while remaining > 0 && amount > 0 {
            let next = if cycle == final_cycle {
                amount
            } else {
                self.decay(amount)?
            };
            let last = if next == amount { final_cycle } else { cycle };
            let start = self.cycle_start_height(cycle);
            let end = if last == final_cycle {
                height
            } else {
                self.cycle_start_height(last + 1) - 1
            };

            let blocks = Amount::from(end - start) + 1;
            let run = amount
                .checked_mul(blocks)
                .map_or(remaining, |total| total.min(remaining));
            minted += run;
            remaining -= run;

            if last == final_cycle {
                break;
            }
            amount = next;
            cycle = last + 1;
        }

        Ok(minted)
    }
}

/// Reconcile a cycle amount against the remaining supply.
///
/// Returns `(minted, remaining_after)`:
/// - `amount <= 0`: nothing is minted, the counter is untouched
/// - `remaining >= amount`: mint `amount`
/// - `0 < remaining < amount`: mint exactly `remaining`, draining the counter
/// - `remaining == 0`: nothing is minted
///
/// `remaining` is never negative: the counter is either absent (and
/// initialized by the caller) or holds a decoded non-negative value.
pub fn reconcile(amount: Amount, remaining: Amount) -> (Amount, Amount) {
    if amount <= 0 {
        return (0, remaining);
    }
    if remaining > 0 && remaining >= amount {
        (amount, remaining - amount)
    } else if remaining > 0 {
        (remaining, 0)
    } else {
        (0, remaining)
    }
}
