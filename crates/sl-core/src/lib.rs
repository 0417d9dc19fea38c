//! # sl-core: shared types for SlotLine
//!
//! Holds the configuration error taxonomy used by every layer of the payout
//! engine, and the integer amount type all stakes and wins are expressed in.

pub mod error;

pub use error::*;

/// Currency-agnostic integer amount (stakes, wins, balances)
pub type Amount = u64;
