//! # mintage-core
//! Parameter set and emission scheduler for the Mintage supply schedule.
//!
//! All arithmetic is integer-only so every node replaying the same history
//! mints byte-identical amounts:
//! - [`params::Params`]: the validated economic constants of the schedule
//! - [`schedule::Schedule`]: pure per-cycle decay math over a parameter set
//! - [`minter::Minter`]: the stateful per-block scheduler that reconciles the
//!   decayed amount against the persisted remaining-supply counter
//! - [`store`] / [`param_store`]: the storage seams the scheduler consumes

pub mod constants;
pub mod error;
pub mod minter;
pub mod param_store;
pub mod params;
pub mod schedule;
pub mod store;

pub use error::{MintError, ParamsError, StoreError};
pub use minter::{MintOutcome, Minter};
pub use param_store::{FixedParams, KvParamStore, ParamStore};
pub use params::{Amount, Params};
pub use schedule::Schedule;
pub use store::{KvStore, MemoryStore, Prefixed};
