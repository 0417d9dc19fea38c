//! Parallel spin simulation

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use sl_core::{Amount, ConfigError};
use sl_payout::{PayoutEngine, WinTier};

/// Simulation errors
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Spin count must be positive")]
    ZeroSpins,

    #[error("Chunk size must be positive")]
    ZeroChunkSize,

    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type SimResult<T> = Result<T, SimError>;

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub spins: u64,
    /// Bet per spin (per line for payline games)
    pub bet: Amount,
    pub seed: u64,
    /// Spins per independently seeded chunk
    pub chunk_size: u64,
    /// Worker threads
    pub threads: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            spins: 100_000,
            bet: 10,
            seed: 0,
            chunk_size: 10_000,
            threads: num_cpus::get(),
        }
    }
}

impl SimConfig {
    pub fn new(spins: u64, bet: Amount, seed: u64) -> Self {
        Self {
            spins,
            bet,
            seed,
            ..Default::default()
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }
}

/// Aggregated simulation results
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimReport {
    pub spins: u64,
    pub total_stake: Amount,
    pub total_win: Amount,
    pub winning_spins: u64,
    pub max_win: Amount,
    /// Return to player, percent
    pub rtp: f64,
    /// Winning spins, percent
    pub hit_rate: f64,
    pub tier_counts: BTreeMap<WinTier, u64>,
}

/// Raw counters for one chunk; merged before the ratios are derived
#[derive(Debug, Clone, Default)]
struct ChunkStats {
    spins: u64,
    total_stake: Amount,
    total_win: Amount,
    winning_spins: u64,
    max_win: Amount,
    tier_counts: BTreeMap<WinTier, u64>,
}

impl ChunkStats {
    fn merge(mut self, other: ChunkStats) -> ChunkStats {
        self.spins += other.spins;
        self.total_stake = self.total_stake.saturating_add(other.total_stake);
        self.total_win = self.total_win.saturating_add(other.total_win);
        self.winning_spins += other.winning_spins;
        self.max_win = self.max_win.max(other.max_win);
        for (tier, count) in other.tier_counts {
            *self.tier_counts.entry(tier).or_insert(0) += count;
        }
        self
    }

    fn into_report(self) -> SimReport {
        let rtp = if self.total_stake > 0 {
            self.total_win as f64 / self.total_stake as f64 * 100.0
        } else {
            0.0
        };
        let hit_rate = if self.spins > 0 {
            self.winning_spins as f64 / self.spins as f64 * 100.0
        } else {
            0.0
        };

        SimReport {
            spins: self.spins,
            total_stake: self.total_stake,
            total_win: self.total_win,
            winning_spins: self.winning_spins,
            max_win: self.max_win,
            rtp,
            hit_rate,
            tier_counts: self.tier_counts,
        }
    }
}

fn run_chunk(
    engine: &PayoutEngine,
    bet: Amount,
    seed: u64,
    chunk: u64,
    spins: u64,
) -> SimResult<ChunkStats> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(chunk);
    let mut stats = ChunkStats::default();

    for _ in 0..spins {
        let result = engine.spin(bet, &mut rng)?;
        let win = result.report.total_win;

        stats.spins += 1;
        stats.total_stake = stats.total_stake.saturating_add(result.stake);
        stats.total_win = stats.total_win.saturating_add(win);
        if win > 0 {
            stats.winning_spins += 1;
        }
        stats.max_win = stats.max_win.max(win);
        *stats.tier_counts.entry(result.tier).or_insert(0) += 1;
    }

    Ok(stats)
}

/// Run `config.spins` spins and aggregate the results
///
/// Every chunk is keyed by `seed` and draws from its own ChaCha stream
/// (`set_stream(chunk_index)`), so the report depends on the seed and chunk
/// size only.
pub fn simulate(engine: &PayoutEngine, config: &SimConfig) -> SimResult<SimReport> {
    if config.spins == 0 {
        return Err(SimError::ZeroSpins);
    }
    if config.chunk_size == 0 {
        return Err(SimError::ZeroChunkSize);
    }

    let chunks = config.spins.div_ceil(config.chunk_size);
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads.max(1))
        .build()
        .map_err(|e| SimError::ThreadPool(e.to_string()))?;

    log::info!(
        "[Sim] {} spins at bet {} in {} chunks on {} threads",
        config.spins,
        config.bet,
        chunks,
        pool.current_num_threads()
    );

    let merged = pool.install(|| {
        (0..chunks)
            .into_par_iter()
            .map(|chunk| {
                let start = chunk * config.chunk_size;
                let spins = config.chunk_size.min(config.spins - start);
                run_chunk(engine, config.bet, config.seed, chunk, spins)
            })
            .try_reduce(ChunkStats::default, |a, b| Ok(a.merge(b)))
    })?;

    let report = merged.into_report();
    log::info!(
        "[Sim] RTP {:.2}% hit rate {:.2}% max win {}",
        report.rtp,
        report.hit_rate,
        report.max_win
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sl_payout::GameConfig;

    fn classic() -> PayoutEngine {
        PayoutEngine::from_config(GameConfig::classic()).unwrap()
    }

    #[test]
    fn test_rejects_empty_runs() {
        let engine = classic();
        assert!(matches!(
            simulate(&engine, &SimConfig::new(0, 10, 1)),
            Err(SimError::ZeroSpins)
        ));

        let config = SimConfig {
            chunk_size: 0,
            ..SimConfig::new(10, 10, 1)
        };
        assert!(matches!(simulate(&engine, &config), Err(SimError::ZeroChunkSize)));
    }

    #[test]
    fn test_partial_last_chunk() {
        let config = SimConfig {
            chunk_size: 300,
            ..SimConfig::new(1000, 10, 3)
        };
        let report = simulate(&classic(), &config).unwrap();
        assert_eq!(report.spins, 1000);
        assert_eq!(report.total_stake, 10_000);
        assert_eq!(report.tier_counts.values().sum::<u64>(), 1000);
    }

    #[test]
    fn test_adjacent_seeds_give_distinct_reports() {
        // Two chunks per run: low seed bits must not just reorder the streams
        let engine = classic();
        let a = simulate(&engine, &SimConfig::new(20_000, 10, 0)).unwrap();
        let b = simulate(&engine, &SimConfig::new(20_000, 10, 1)).unwrap();
        assert_eq!(a.spins, b.spins);
        assert_ne!(a, b);
    }

    #[test]
    fn test_zero_bet_surfaces_config_error() {
        assert!(matches!(
            simulate(&classic(), &SimConfig::new(10, 0, 1)),
            Err(SimError::Config(ConfigError::ZeroBet))
        ));
    }
}
