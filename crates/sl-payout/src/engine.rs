//! Payout Engine: configured symbol table + evaluator

use rand::Rng;
use serde::Serialize;

use sl_core::{Amount, ConfigError, ConfigResult};

use crate::config::{BetLimits, GameConfig};
use crate::evaluator::{WinEvaluator, WinReport};
use crate::grid::{Grid, sample_grid};
use crate::paylines::PaylineSet;
use crate::symbols::SymbolTable;
use crate::win_tiers::{WinTier, WinTierThresholds};

/// Payout Engine
///
/// Read-only after construction apart from payline toggles. Holds no random
/// source: callers bring their own, so one engine can serve any thread.
#[derive(Debug, Clone)]
pub struct PayoutEngine {
    config: GameConfig,
    table: SymbolTable,
    evaluator: WinEvaluator,
}

/// Result of a single spin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpinResult {
    pub grid: Grid,
    pub report: WinReport,
    /// Total amount debited (bet × active lines for payline games)
    pub stake: Amount,
    pub tier: WinTier,
}

impl SpinResult {
    /// Win as a multiple of the stake
    pub fn win_ratio(&self) -> f64 {
        if self.stake > 0 {
            self.report.total_win as f64 / self.stake as f64
        } else {
            0.0
        }
    }
}

impl PayoutEngine {
    /// Validate a configuration and build the engine
    pub fn from_config(config: GameConfig) -> ConfigResult<Self> {
        config.validate()?;
        let table = config.symbol_table()?;
        let evaluator = config.build_evaluator()?;

        log::debug!(
            "[Engine] '{}' ready: {:?} {}x{}, {} symbols",
            config.name,
            config.variant,
            config.rows,
            config.cols,
            table.len()
        );

        Ok(Self {
            config,
            table,
            evaluator,
        })
    }

    /// Sample a grid and evaluate it
    pub fn spin<R: Rng + ?Sized>(&self, bet: Amount, rng: &mut R) -> ConfigResult<SpinResult> {
        if bet == 0 {
            return Err(ConfigError::ZeroBet);
        }

        let (rows, cols) = self.evaluator.shape();
        let grid = sample_grid(rows, cols, &self.table, rng)?;
        let report = self.evaluator.evaluate(&grid, bet, &self.table)?;
        let stake = self.stake_for(bet);
        let tier = self.config.win_tiers.classify(report.total_win, stake);

        Ok(SpinResult {
            grid,
            report,
            stake,
            tier,
        })
    }

    /// Evaluate an externally supplied grid
    pub fn evaluate(&self, grid: &Grid, bet: Amount) -> ConfigResult<WinReport> {
        self.evaluator.evaluate(grid, bet, &self.table)
    }

    /// Total debit for a spin at `bet`
    pub fn stake_for(&self, bet: Amount) -> Amount {
        self.evaluator.stake(bet)
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn symbol_table(&self) -> &SymbolTable {
        &self.table
    }

    pub fn evaluator(&self) -> &WinEvaluator {
        &self.evaluator
    }

    pub fn bet_limits(&self) -> BetLimits {
        self.config.bet_limits
    }

    pub fn win_tiers(&self) -> &WinTierThresholds {
        &self.config.win_tiers
    }

    /// Payline toggles (None for games without paylines)
    pub fn paylines(&self) -> Option<&PaylineSet> {
        self.evaluator.paylines()
    }

    pub fn paylines_mut(&mut self) -> Option<&mut PaylineSet> {
        self.evaluator.paylines_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_engine_from_presets() {
        for config in [
            GameConfig::classic(),
            GameConfig::twenty_line(),
            GameConfig::grid_5x5(),
        ] {
            let engine = PayoutEngine::from_config(config).unwrap();
            let mut rng = StdRng::seed_from_u64(5);
            let result = engine.spin(10, &mut rng).unwrap();
            let (rows, cols) = engine.evaluator().shape();
            assert_eq!(result.grid.rows(), rows);
            assert_eq!(result.grid.cols(), cols);
            assert!(result.report.winning_cells.iter().all(|&i| i < rows * cols));
        }
    }

    #[test]
    fn test_spin_reproducible() {
        let engine = PayoutEngine::from_config(GameConfig::twenty_line()).unwrap();
        let a = engine.spin(2, &mut StdRng::seed_from_u64(11)).unwrap();
        let b = engine.spin(2, &mut StdRng::seed_from_u64(11)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stake_follows_paylines() {
        let mut engine = PayoutEngine::from_config(GameConfig::twenty_line()).unwrap();
        assert_eq!(engine.stake_for(3), 60);

        engine.paylines_mut().unwrap().set_active_count(10);
        assert_eq!(engine.stake_for(3), 30);

        let classic = PayoutEngine::from_config(GameConfig::classic()).unwrap();
        assert_eq!(classic.stake_for(3), 3);
        assert!(classic.paylines().is_none());
    }

    #[test]
    fn test_zero_bet_rejected() {
        let engine = PayoutEngine::from_config(GameConfig::classic()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(engine.spin(0, &mut rng).unwrap_err(), ConfigError::ZeroBet);
    }

    #[test]
    fn test_evaluate_external_grid() {
        let engine = PayoutEngine::from_config(GameConfig::classic()).unwrap();
        let grid = Grid::from_rows(vec![vec![7, 7, 7]]).unwrap();
        assert_eq!(engine.evaluate(&grid, 10).unwrap().total_win, 1000);
    }
}
