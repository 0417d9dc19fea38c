//! # sl-payout: Slot Payout Engine
//!
//! Draws symbols from a weighted table, fills a grid, and evaluates it into a
//! win report. Three game variants share the same pipeline.
//!
//! ## Features
//!
//! - **Weighted sampling**: cumulative-weight table, O(log n) per draw
//! - **Three-of-a-kind**: 1×3 triples and pairs
//! - **Payline sets**: left-to-right runs with wild substitution
//! - **Lines & diagonals**: square grids with a global tally
//! - **Sessions**: balance, bet limits, stats and a progressive jackpot
//!
//! ## Architecture
//!
//! ```text
//! GameConfig ──> PayoutEngine
//!                    │
//!                    ├── SymbolTable (weights, multipliers, wilds)
//!                    └── WinEvaluator (variant rules, payline toggles)
//!                          │
//!                          v
//!     sample_grid ──> Grid ──> WinReport ──> SpinResult
//!                                               │
//!                                               v
//!                          play_spin(SessionState) ──> SessionState'
//! ```

pub mod config;
pub mod engine;
pub mod evaluator;
pub mod grid;
pub mod jackpot;
pub mod parser;
pub mod paylines;
pub mod session;
pub mod symbols;
pub mod win_tiers;

pub use config::*;
pub use engine::*;
pub use evaluator::*;
pub use grid::*;
pub use jackpot::*;
pub use parser::*;
pub use paylines::*;
pub use session::*;
pub use symbols::*;
pub use win_tiers::*;

pub use sl_core::{Amount, ConfigError, ConfigResult};
