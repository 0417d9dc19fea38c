//! Player session: balance, bet and running statistics
//!
//! State is a plain value: `play_spin` takes the current state and returns the
//! next one, leaving the input untouched. A rejected spin never debits.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sl_core::{Amount, ConfigError};

use crate::config::BetLimits;
use crate::engine::{PayoutEngine, SpinResult};
use crate::jackpot::JackpotPool;

/// Session errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Bet {bet} outside the allowed range {min}..={max}")]
    BetOutOfRange { bet: Amount, min: Amount, max: Amount },

    #[error("Insufficient balance: {balance} available, {required} required")]
    InsufficientBalance { balance: Amount, required: Amount },

    #[error("No active paylines")]
    NoActiveLines,

    #[error("Daily bonus already claimed this period")]
    BonusAlreadyClaimed,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// Daily bonus range, inclusive
pub const DAILY_BONUS_MIN: Amount = 50;
pub const DAILY_BONUS_MAX: Amount = 200;

/// Session statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub games_played: u64,
    pub wins_count: u64,
    #[serde(default)]
    pub losses_count: u64,
    pub biggest_win: Amount,
    pub total_staked: Amount,
    pub total_won: Amount,
    pub jackpots_won: u64,
}

impl SessionStats {
    /// Return to player, percent of stake
    pub fn rtp(&self) -> f64 {
        if self.total_staked > 0 {
            (self.total_won as f64 / self.total_staked as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Share of winning spins, percent
    pub fn hit_rate(&self) -> f64 {
        if self.games_played > 0 {
            (self.wins_count as f64 / self.games_played as f64) * 100.0
        } else {
            0.0
        }
    }
}

/// Player state carried between spins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub balance: Amount,
    pub bet: Amount,
    #[serde(default)]
    pub stats: SessionStats,
    /// Set once the bonus is taken; cleared by `start_bonus_period`
    #[serde(default)]
    pub daily_bonus_claimed: bool,
}

/// What one settled spin did to the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpinOutcome {
    pub spin: SpinResult,
    /// Jackpot paid on top of the line win
    pub jackpot_award: Option<Amount>,
    /// Line win + jackpot
    pub payout: Amount,
    pub balance_before: Amount,
    pub balance_after: Amount,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.payout > 0
    }
}

impl SessionState {
    pub fn new(balance: Amount, bet: Amount) -> Self {
        Self {
            balance,
            bet,
            stats: SessionStats::default(),
            daily_bonus_claimed: false,
        }
    }

    pub fn bonus_available(&self) -> bool {
        !self.daily_bonus_claimed
    }

    /// Open a new claim period (the host calls this at its day boundary)
    pub fn start_bonus_period(&mut self) {
        self.daily_bonus_claimed = false;
    }

    /// Change the bet; the state is untouched on error
    pub fn set_bet(&mut self, bet: Amount, limits: BetLimits) -> SessionResult<()> {
        check_limits(bet, limits)?;
        if bet > self.balance {
            return Err(SessionError::InsufficientBalance {
                balance: self.balance,
                required: bet,
            });
        }
        self.bet = bet;
        Ok(())
    }

    pub fn rtp(&self) -> f64 {
        self.stats.rtp()
    }

    pub fn hit_rate(&self) -> f64 {
        self.stats.hit_rate()
    }
}

/// Credit the daily bonus, a uniform draw from
/// `DAILY_BONUS_MIN..=DAILY_BONUS_MAX`, at most once per claim period
pub fn claim_daily_bonus<R: Rng + ?Sized>(
    state: &SessionState,
    rng: &mut R,
) -> SessionResult<(SessionState, Amount)> {
    if state.daily_bonus_claimed {
        return Err(SessionError::BonusAlreadyClaimed);
    }

    let bonus = rng.random_range(DAILY_BONUS_MIN..=DAILY_BONUS_MAX);
    let mut next = state.clone();
    next.balance = state.balance.saturating_add(bonus);
    next.daily_bonus_claimed = true;

    log::info!("[Session] daily bonus {} → balance {}", bonus, next.balance);
    Ok((next, bonus))
}

fn check_limits(bet: Amount, limits: BetLimits) -> SessionResult<()> {
    if !limits.contains(bet) {
        return Err(SessionError::BetOutOfRange {
            bet,
            min: limits.min_bet,
            max: limits.max_bet,
        });
    }
    Ok(())
}

/// Play one spin at the state's current bet
///
/// Checks run before any debit: bet limits, active lines, then balance
/// against the full stake. The jackpot pool, when given, is settled after
/// evaluation.
pub fn play_spin<R: Rng + ?Sized>(
    state: &SessionState,
    engine: &PayoutEngine,
    jackpot: Option<&mut JackpotPool>,
    rng: &mut R,
) -> SessionResult<(SessionState, SpinOutcome)> {
    check_limits(state.bet, engine.bet_limits())?;

    let stake = engine.stake_for(state.bet);
    if stake == 0 {
        return Err(SessionError::NoActiveLines);
    }
    if stake > state.balance {
        log::warn!(
            "[Session] insufficient balance: {} < stake {}",
            state.balance,
            stake
        );
        return Err(SessionError::InsufficientBalance {
            balance: state.balance,
            required: stake,
        });
    }

    let spin = engine.spin(state.bet, rng)?;
    let jackpot_award = jackpot.and_then(|pool| pool.settle(&spin.report, stake, rng));
    let payout = spin
        .report
        .total_win
        .saturating_add(jackpot_award.unwrap_or(0));

    let mut next = state.clone();
    next.balance = (state.balance - stake).saturating_add(payout);

    let stats = &mut next.stats;
    stats.games_played += 1;
    stats.total_staked = stats.total_staked.saturating_add(stake);
    stats.total_won = stats.total_won.saturating_add(payout);
    if payout > 0 {
        stats.wins_count += 1;
        stats.biggest_win = stats.biggest_win.max(payout);
    } else {
        stats.losses_count += 1;
    }
    if jackpot_award.is_some() {
        stats.jackpots_won += 1;
    }

    if payout > 0 {
        log::info!(
            "[Session] {} on stake {} ({})",
            payout,
            stake,
            spin.tier.display_name()
        );
    }

    let outcome = SpinOutcome {
        spin,
        jackpot_award,
        payout,
        balance_before: state.balance,
        balance_after: next.balance,
    };
    Ok((next, outcome))
}
