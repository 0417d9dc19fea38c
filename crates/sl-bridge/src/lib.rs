//! Host Bridge: deliver settled spins to the hosting platform
//!
//! A spin is settled locally first, then reported. The local balance and
//! jackpot pool only move forward once the host acknowledges the report;
//! anything else leaves the pre-spin checkpoint in place.

pub mod payload;
pub mod sync;
pub mod transport;

pub use payload::*;
pub use sync::*;
pub use transport::*;
