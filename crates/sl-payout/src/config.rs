//! Game configuration and built-in presets

use serde::{Deserialize, Serialize};

use sl_core::{Amount, ConfigError, ConfigResult};

use crate::evaluator::WinEvaluator;
use crate::jackpot::JackpotConfig;
use crate::paylines::{Payline, PaylineSet, standard_20_paylines};
use crate::symbols::{Symbol, SymbolTable};
use crate::win_tiers::WinTierThresholds;

/// Game variant (selects the win evaluator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// 1×3, triples and pairs
    ThreeOfAKind,
    /// Runs along fixed paylines with wilds
    FixedPaylineSet,
    /// Square grid: tally, rows, columns, diagonals
    LinesAndDiagonals,
}

/// Allowed bet range (per line for payline games)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetLimits {
    pub min_bet: Amount,
    pub max_bet: Amount,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            min_bet: 10,
            max_bet: 500,
        }
    }
}

impl BetLimits {
    pub fn new(min_bet: Amount, max_bet: Amount) -> Self {
        Self { min_bet, max_bet }
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.min_bet == 0 || self.min_bet > self.max_bet {
            return Err(ConfigError::InvalidBetLimits {
                min: self.min_bet,
                max: self.max_bet,
            });
        }
        Ok(())
    }

    pub fn contains(&self, bet: Amount) -> bool {
        (self.min_bet..=self.max_bet).contains(&bet)
    }
}

/// Complete game definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub name: String,
    pub variant: Variant,
    pub rows: usize,
    pub cols: usize,
    pub symbols: Vec<Symbol>,

    /// Payline patterns; the standard 20 are used for a 5×3 payline game
    /// when absent
    #[serde(default)]
    pub paylines: Option<Vec<Payline>>,

    /// Number of lines enabled at start (all when absent)
    #[serde(default)]
    pub active_lines: Option<usize>,

    #[serde(default)]
    pub bet_limits: BetLimits,

    #[serde(default)]
    pub jackpot: Option<JackpotConfig>,

    #[serde(default)]
    pub win_tiers: WinTierThresholds,
}

impl GameConfig {
    /// Three-reel fruit machine
    pub fn classic() -> Self {
        Self {
            name: "Classic Fruits".into(),
            variant: Variant::ThreeOfAKind,
            rows: 1,
            cols: 3,
            symbols: vec![
                Symbol::triple(1, "🍒", 30, 2),
                Symbol::triple(2, "🍋", 25, 3),
                Symbol::triple(3, "🍊", 20, 4),
                Symbol::triple(4, "🍇", 15, 5),
                Symbol::triple(5, "🔔", 7, 10),
                Symbol::triple(6, "⭐", 2, 20),
                Symbol::triple(7, "7️⃣", 1, 100),
            ],
            paylines: None,
            active_lines: None,
            bet_limits: BetLimits::new(10, 500),
            jackpot: Some(JackpotConfig::new(7)),
            win_tiers: WinTierThresholds::default(),
        }
    }

    /// 5×3, 20 paylines, with a wild
    pub fn twenty_line() -> Self {
        Self {
            name: "Twenty Line Fruits".into(),
            variant: Variant::FixedPaylineSet,
            rows: 3,
            cols: 5,
            symbols: vec![
                Symbol::regular(1, "🍒", 30, &[(3, 2), (4, 5), (5, 10)]),
                Symbol::regular(2, "🍋", 25, &[(3, 3), (4, 8), (5, 15)]),
                Symbol::regular(3, "🍊", 20, &[(3, 4), (4, 10), (5, 20)]),
                Symbol::regular(4, "🍇", 15, &[(3, 5), (4, 15), (5, 30)]),
                Symbol::regular(5, "🔔", 7, &[(3, 10), (4, 30), (5, 75)]),
                Symbol::regular(6, "⭐", 2, &[(3, 20), (4, 60), (5, 150)]),
                Symbol::regular(7, "7️⃣", 1, &[(3, 100), (4, 300), (5, 1000)]),
                Symbol::wild(8, "🃏", 3),
            ],
            paylines: Some(standard_20_paylines()),
            active_lines: None,
            bet_limits: BetLimits::new(1, 50),
            jackpot: None,
            win_tiers: WinTierThresholds::default(),
        }
    }

    /// 5×5 lines-and-diagonals grid
    ///
    /// Tally keys sit above the usual count of the common symbols; full
    /// lines read the `5` key.
    pub fn grid_5x5() -> Self {
        Self {
            name: "Fruit Grid 5x5".into(),
            variant: Variant::LinesAndDiagonals,
            rows: 5,
            cols: 5,
            symbols: vec![
                Symbol::regular(1, "🍒", 30, &[(5, 5), (11, 1), (12, 2), (13, 4)]),
                Symbol::regular(2, "🍋", 25, &[(5, 8), (10, 1), (11, 2), (12, 5)]),
                Symbol::regular(3, "🍊", 20, &[(5, 12), (9, 1), (10, 3), (11, 6)]),
                Symbol::regular(4, "🍇", 15, &[(5, 20), (8, 2), (9, 4), (10, 8)]),
                Symbol::regular(5, "🔔", 7, &[(5, 50), (6, 5), (7, 10), (8, 20)]),
                Symbol::regular(6, "⭐", 2, &[(5, 200), (6, 25), (7, 50), (8, 100)]),
                Symbol::regular(7, "7️⃣", 1, &[(5, 1000), (6, 100), (7, 250), (8, 500)]),
            ],
            paylines: None,
            active_lines: None,
            bet_limits: BetLimits::new(10, 500),
            jackpot: Some(JackpotConfig {
                trigger_run: 5,
                ..JackpotConfig::new(7)
            }),
            win_tiers: WinTierThresholds::default(),
        }
    }

    /// Build the symbol table
    pub fn symbol_table(&self) -> ConfigResult<SymbolTable> {
        SymbolTable::new(self.symbols.clone())
    }

    /// Build the evaluator for this variant, checking shape rules
    pub fn build_evaluator(&self) -> ConfigResult<WinEvaluator> {
        match self.variant {
            Variant::ThreeOfAKind => {
                if (self.rows, self.cols) != (1, 3) {
                    return Err(ConfigError::InvalidDimensions {
                        rows: self.rows,
                        cols: self.cols,
                    });
                }
                Ok(WinEvaluator::three_of_a_kind())
            }
            Variant::FixedPaylineSet => {
                let lines = match &self.paylines {
                    Some(lines) => lines.clone(),
                    None if (self.rows, self.cols) == (3, 5) => standard_20_paylines(),
                    None => (0..self.rows)
                        .map(|row| Payline::straight(row as u8, row as u8, self.cols as u8))
                        .collect(),
                };
                let mut set = PaylineSet::new(lines);
                if let Some(count) = self.active_lines {
                    set.set_active_count(count);
                }
                WinEvaluator::fixed_paylines(self.rows, self.cols, set)
            }
            Variant::LinesAndDiagonals => {
                if self.rows != self.cols {
                    return Err(ConfigError::InvalidDimensions {
                        rows: self.rows,
                        cols: self.cols,
                    });
                }
                WinEvaluator::lines_and_diagonals(self.rows)
            }
        }
    }

    /// Full semantic validation
    pub fn validate(&self) -> ConfigResult<()> {
        let table = self.symbol_table()?;
        let evaluator = self.build_evaluator()?;
        evaluator.validate(&table)?;
        self.bet_limits.validate()?;

        if let Some(jackpot) = &self.jackpot {
            jackpot.validate()?;
            table.lookup(jackpot.trigger_symbol)?;
        }
        Ok(())
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::classic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(GameConfig::classic().validate().is_ok());
        assert!(GameConfig::twenty_line().validate().is_ok());
        assert!(GameConfig::grid_5x5().validate().is_ok());
    }

    #[test]
    fn test_classic_shape_enforced() {
        let mut config = GameConfig::classic();
        config.cols = 5;
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::InvalidDimensions { rows: 1, cols: 5 }
        );
    }

    #[test]
    fn test_square_grid_enforced() {
        let mut config = GameConfig::grid_5x5();
        config.rows = 4;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { rows: 4, cols: 5 })
        ));
    }

    #[test]
    fn test_default_paylines() {
        let mut config = GameConfig::twenty_line();
        config.paylines = None;
        let evaluator = config.build_evaluator().unwrap();
        assert_eq!(evaluator.paylines().map(|p| p.len()), Some(20));

        config.rows = 2;
        let evaluator = config.build_evaluator().unwrap();
        assert_eq!(evaluator.paylines().map(|p| p.len()), Some(2));
    }

    #[test]
    fn test_active_lines() {
        let mut config = GameConfig::twenty_line();
        config.active_lines = Some(5);
        let evaluator = config.build_evaluator().unwrap();
        assert_eq!(evaluator.stake(2), 10);
    }

    #[test]
    fn test_bad_bet_limits() {
        let mut config = GameConfig::classic();
        config.bet_limits = BetLimits::new(100, 10);
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::InvalidBetLimits { min: 100, max: 10 }
        );
        assert!(BetLimits::new(10, 500).contains(10));
        assert!(!BetLimits::new(10, 500).contains(501));
    }

    #[test]
    fn test_unknown_jackpot_symbol() {
        let mut config = GameConfig::classic();
        config.jackpot = Some(JackpotConfig::new(42));
        assert_eq!(config.validate().unwrap_err(), ConfigError::UnknownSymbol(42));
    }

    #[test]
    fn test_wild_rejected_outside_paylines() {
        let mut config = GameConfig::grid_5x5();
        config.symbols.push(Symbol::wild(9, "🃏", 1));
        assert_eq!(config.validate().unwrap_err(), ConfigError::WildNotSupported);
    }
}
