//! # sl-sim: Batch Spin Simulator
//!
//! Runs millions of spins across a rayon pool to measure return-to-player,
//! hit rate and the win-tier spread of a game configuration. Spins are split
//! into fixed-size chunks, each with its own seeded ChaCha stream, so a seed
//! gives the same report on any number of threads.

pub mod simulator;
pub mod stats;

pub use simulator::*;
pub use stats::*;
