//! Progressive jackpot pool

use rand::Rng;
use serde::{Deserialize, Serialize};

use sl_core::{Amount, ConfigError, ConfigResult};

use crate::evaluator::WinReport;

fn default_seed_amount() -> Amount {
    5000
}

fn default_contribution_percent() -> u64 {
    1
}

fn default_chance() -> f64 {
    0.001
}

fn default_trigger_run() -> usize {
    3
}

/// Jackpot configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JackpotConfig {
    /// Pool value after reset
    #[serde(default = "default_seed_amount")]
    pub seed_amount: Amount,
    /// Share of every stake fed into the pool (integer percent)
    #[serde(default = "default_contribution_percent")]
    pub contribution_percent: u64,
    /// Probability of an award once triggered
    #[serde(default = "default_chance")]
    pub chance: f64,
    /// Symbol whose run triggers the roll
    pub trigger_symbol: u32,
    /// Minimum run (or tally) of the trigger symbol
    #[serde(default = "default_trigger_run")]
    pub trigger_run: usize,
}

impl JackpotConfig {
    pub fn new(trigger_symbol: u32) -> Self {
        Self {
            seed_amount: default_seed_amount(),
            contribution_percent: default_contribution_percent(),
            chance: default_chance(),
            trigger_symbol,
            trigger_run: default_trigger_run(),
        }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(0.0..=1.0).contains(&self.chance) {
            return Err(ConfigError::InvalidParam(format!(
                "jackpot chance {} outside [0, 1]",
                self.chance
            )));
        }
        if self.contribution_percent > 100 {
            return Err(ConfigError::InvalidParam(format!(
                "jackpot contribution {}% above 100%",
                self.contribution_percent
            )));
        }
        if self.trigger_run == 0 {
            return Err(ConfigError::InvalidParam("jackpot trigger run is 0".into()));
        }
        Ok(())
    }

    /// Check whether a report qualifies for the award roll
    pub fn is_triggered(&self, report: &WinReport) -> bool {
        report
            .longest_run
            .is_some_and(|r| r.symbol_id == self.trigger_symbol && r.length >= self.trigger_run)
    }
}

/// Running pool value plus award history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JackpotPool {
    config: JackpotConfig,
    amount: Amount,
    awards: u64,
    last_award: Option<Amount>,
}

impl JackpotPool {
    /// Pool starting at the seed amount
    pub fn new(config: JackpotConfig) -> Self {
        Self {
            amount: config.seed_amount,
            config,
            awards: 0,
            last_award: None,
        }
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn awards(&self) -> u64 {
        self.awards
    }

    pub fn last_award(&self) -> Option<Amount> {
        self.last_award
    }

    pub fn config(&self) -> &JackpotConfig {
        &self.config
    }

    /// Settle one spin against the pool
    ///
    /// A triggered spin rolls `chance`; on success the whole pool is paid
    /// out and reset to the seed. Every spin that is not awarded feeds
    /// `stake × contribution_percent / 100` into the pool.
    pub fn settle<R: Rng + ?Sized>(
        &mut self,
        report: &WinReport,
        stake: Amount,
        rng: &mut R,
    ) -> Option<Amount> {
        if self.config.is_triggered(report) && rng.random::<f64>() < self.config.chance {
            let award = self.amount;
            self.amount = self.config.seed_amount;
            self.awards += 1;
            self.last_award = Some(award);
            log::info!("[Jackpot] awarded {} (reset to {})", award, self.amount);
            return Some(award);
        }

        let contribution = stake.saturating_mul(self.config.contribution_percent) / 100;
        self.amount = self.amount.saturating_add(contribution);
        None
    }

    /// Manual reset to the seed amount
    pub fn reset(&mut self) {
        self.amount = self.config.seed_amount;
        self.last_award = None;
        log::warn!("[Jackpot] pool reset to {}", self.amount);
    }
}
