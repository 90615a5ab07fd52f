//! End-to-end test suite for the Mintage emission schedule.
//!
//! Drives the scheduler block by block over in-memory and RocksDB stores and
//! checks the supply invariants that every node replaying the same history
//! relies on.

pub mod helpers;
