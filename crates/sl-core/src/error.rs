//! Error types for SlotLine

use thiserror::Error;

/// Malformed configuration or request.
///
/// Always fatal to the call that raised it and surfaced to the caller before
/// any balance is touched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Paytable is empty")]
    EmptyPaytable,

    #[error("Symbol {0} has a zero weight")]
    ZeroWeight(String),

    #[error("Total symbol weight must be positive")]
    ZeroTotalWeight,

    #[error("Duplicate symbol id: {0}")]
    DuplicateSymbol(u32),

    #[error("Unknown symbol id: {0}")]
    UnknownSymbol(u32),

    #[error("Symbol {symbol} has no multiplier for a run of {length}")]
    MissingMultipliers { symbol: String, length: u8 },

    #[error("Invalid grid dimensions: {rows}x{cols}")]
    InvalidDimensions { rows: usize, cols: usize },

    #[error("Grid is {actual_rows}x{actual_cols}, evaluator expects {rows}x{cols}")]
    ShapeMismatch {
        rows: usize,
        cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("Invalid payline {index}: {reason}")]
    InvalidPayline { index: u8, reason: String },

    #[error("Wild symbols are not supported by this variant")]
    WildNotSupported,

    #[error("Bet must be positive")]
    ZeroBet,

    #[error("Invalid bet limits: min {min} > max {max}")]
    InvalidBetLimits { min: u64, max: u64 },

    #[error("Invalid parameter: {0}")]
    InvalidParam(String),
}

/// Result type alias
pub type ConfigResult<T> = Result<T, ConfigError>;
