//! Win Tiers: win categorization by win / stake ratio

use serde::{Deserialize, Serialize};

use sl_core::Amount;

/// Celebration tier of a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WinTier {
    NoWin,
    Good,
    Great,
    Big,
    Huge,
    Jackpot,
}

impl WinTier {
    /// Classify with the standard thresholds
    pub fn classify(win: Amount, stake: Amount) -> Self {
        WinTierThresholds::default().classify(win, stake)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NoWin => "No Win",
            Self::Good => "Good Win",
            Self::Great => "Great Win",
            Self::Big => "Big Win",
            Self::Huge => "Huge Win",
            Self::Jackpot => "Jackpot",
        }
    }

    pub fn is_win(&self) -> bool {
        *self != Self::NoWin
    }
}

/// Minimum win ratios (win / stake) for each tier above `Good`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WinTierThresholds {
    pub great: f64,
    pub big: f64,
    pub huge: f64,
    pub jackpot: f64,
}

impl Default for WinTierThresholds {
    fn default() -> Self {
        Self {
            great: 5.0,
            big: 10.0,
            huge: 20.0,
            jackpot: 100.0,
        }
    }
}

impl WinTierThresholds {
    /// Get tier for a win at the given stake
    ///
    /// A zero stake with a positive win (a jackpot on disabled lines, say)
    /// counts as the top tier.
    pub fn classify(&self, win: Amount, stake: Amount) -> WinTier {
        if win == 0 {
            return WinTier::NoWin;
        }
        if stake == 0 {
            return WinTier::Jackpot;
        }

        match win as f64 / stake as f64 {
            r if r >= self.jackpot => WinTier::Jackpot,
            r if r >= self.huge => WinTier::Huge,
            r if r >= self.big => WinTier::Big,
            r if r >= self.great => WinTier::Great,
            _ => WinTier::Good,
        }
    }
}
