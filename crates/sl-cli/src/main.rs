//! SlotLine command-line front end
//!
//! Usage:
//!   slotline spin     --preset classic --bet 10 [--count N] [--seed S] [--json]
//!   slotline simulate --preset twenty-line --bet 1 --spins 1000000 [--seed S]
//!   slotline validate games/my_game.yaml

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;

use sl_bridge::{BridgeClient, BridgeConfig, Checkpoint, HttpTransport, SpinReport};
use sl_payout::{
    ConfigParser, GameConfig, JackpotPool, PayoutEngine, SessionState, SpinOutcome, play_spin,
};
use sl_sim::{SimConfig, simulate};

#[derive(Parser)]
#[command(name = "slotline", version, about = "Slot payout engine tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play spins and print each result
    Spin(SpinArgs),
    /// Run a batch simulation and print RTP / hit rate
    Simulate(SimulateArgs),
    /// Parse and validate a game file
    Validate {
        /// JSON or YAML game definition
        file: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Classic,
    TwentyLine,
    Grid5x5,
}

#[derive(Args)]
struct GameArgs {
    /// Built-in game
    #[arg(long, value_enum, default_value = "classic", conflicts_with = "config")]
    preset: Preset,

    /// Game definition file (JSON or YAML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable only the first N paylines
    #[arg(long)]
    lines: Option<usize>,
}

#[derive(Args)]
struct SpinArgs {
    #[command(flatten)]
    game: GameArgs,

    /// Bet per spin (per line for payline games)
    #[arg(long)]
    bet: u64,

    /// Number of spins
    #[arg(long, default_value_t = 1)]
    count: u32,

    /// Starting balance
    #[arg(long, default_value_t = 1000)]
    balance: u64,

    /// RNG seed (random when absent)
    #[arg(long)]
    seed: Option<u64>,

    /// Print host reports as JSON lines
    #[arg(long)]
    json: bool,

    /// Host endpoint receiving each report
    #[arg(long)]
    report_url: Option<String>,

    /// Player identifier for host reports
    #[arg(long, default_value = "local")]
    user: String,

    /// Host delivery timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u32,
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    game: GameArgs,

    /// Bet per spin (per line for payline games)
    #[arg(long)]
    bet: u64,

    /// Number of spins
    #[arg(long, default_value_t = 1_000_000)]
    spins: u64,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Worker threads (all cores when absent)
    #[arg(long)]
    threads: Option<usize>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Spin(args) => run_spins(args),
        Commands::Simulate(args) => run_simulation(args),
        Commands::Validate { file } => validate(&file),
    }
}

fn load_engine(args: &GameArgs) -> Result<PayoutEngine> {
    let config = match &args.config {
        Some(path) => ConfigParser::new()
            .load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => match args.preset {
            Preset::Classic => GameConfig::classic(),
            Preset::TwentyLine => GameConfig::twenty_line(),
            Preset::Grid5x5 => GameConfig::grid_5x5(),
        },
    };

    let mut engine = PayoutEngine::from_config(config)?;
    if let Some(lines) = args.lines {
        match engine.paylines_mut() {
            Some(set) => set.set_active_count(lines),
            None => bail!("--lines only applies to payline games"),
        }
    }
    Ok(engine)
}

fn run_spins(args: SpinArgs) -> Result<()> {
    let engine = load_engine(&args.game)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut current = Checkpoint::new(
        SessionState::new(args.balance, args.bet),
        engine.config().jackpot.clone().map(JackpotPool::new),
    );

    let bridge_config = BridgeConfig {
        user_id: args.user.clone(),
        timeout_ms: args.timeout_ms,
    };
    let bridge = match &args.report_url {
        Some(url) => {
            let client = BridgeClient::new(HttpTransport::new(url.clone()), bridge_config.clone());
            let runtime = tokio::runtime::Runtime::new().context("Failed to start runtime")?;
            Some((client, runtime))
        }
        None => None,
    };

    for _ in 0..args.count {
        let mut pool = current.pool.clone();
        let (next, outcome) = play_spin(&current.state, &engine, pool.as_mut(), &mut rng)?;
        let after = Checkpoint::new(next, pool);

        if args.json {
            let report =
                SpinReport::from_outcome(bridge_config.user_id.as_str(), &outcome, engine.symbol_table());
            println!("{}", report.to_json()?);
        } else {
            print_outcome(&engine, &outcome);
        }

        current = match &bridge {
            Some((client, runtime)) => {
                let pending = client.pending(current, after, &outcome, engine.symbol_table());
                let (kept, result) = runtime.block_on(client.commit(pending));
                match result {
                    Ok(sync) if sync.is_acknowledged() => {}
                    Ok(sync) => eprintln!("Host did not confirm the spin: {:?}", sync),
                    Err(e) => eprintln!("Host sync failed: {}", e),
                }
                kept
            }
            None => after,
        };
    }

    let state = &current.state;
    if !args.json {
        println!(
            "\nBalance {}  |  spins {}  wins {}  losses {}  biggest {}  RTP {:.1}%",
            state.balance,
            state.stats.games_played,
            state.stats.wins_count,
            state.stats.losses_count,
            state.stats.biggest_win,
            state.rtp()
        );
        if let Some(pool) = &current.pool {
            println!("Jackpot pool {}", pool.amount());
        }
    }
    Ok(())
}

fn print_outcome(engine: &PayoutEngine, outcome: &SpinOutcome) {
    let grid = &outcome.spin.grid;
    let table = engine.symbol_table();

    for row in 0..grid.rows() {
        let names: Vec<&str> = grid
            .row(row)
            .iter()
            .map(|&id| table.get(id).map_or("?", |s| s.name.as_str()))
            .collect();
        println!("  {}", names.join(" "));
    }

    if let Some(award) = outcome.jackpot_award {
        println!("JACKPOT! +{}", award);
    }
    if outcome.is_win() {
        println!(
            "{} +{} (stake {}) → balance {}",
            outcome.spin.tier.display_name(),
            outcome.payout,
            outcome.spin.stake,
            outcome.balance_after
        );
    } else {
        println!(
            "No win (stake {}) → balance {}",
            outcome.spin.stake, outcome.balance_after
        );
    }
}

fn run_simulation(args: SimulateArgs) -> Result<()> {
    let engine = load_engine(&args.game)?;
    let mut config = SimConfig::new(args.spins, args.bet, args.seed);
    if let Some(threads) = args.threads {
        config = config.with_threads(threads);
    }

    let report = simulate(&engine, &config)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Game      {}", engine.config().name);
    println!("Spins     {}", report.spins);
    println!("Staked    {}", report.total_stake);
    println!("Won       {}", report.total_win);
    println!("RTP       {:.3}%", report.rtp);
    println!("Hit rate  {:.3}%", report.hit_rate);
    println!("Max win   {}", report.max_win);
    for (tier, count) in &report.tier_counts {
        println!("  {:<10} {}", tier.display_name(), count);
    }
    Ok(())
}

fn validate(file: &Path) -> Result<()> {
    let config = ConfigParser::new()
        .load(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let engine = PayoutEngine::from_config(config)?;
    let config = engine.config();

    println!("✓ {} is valid", file.display());
    println!("  name     {}", config.name);
    println!("  variant  {:?}", config.variant);
    println!("  grid     {}x{}", config.rows, config.cols);
    println!("  symbols  {}", engine.symbol_table().len());
    if let Some(lines) = engine.paylines() {
        println!("  lines    {} ({} active)", lines.len(), lines.active_count());
    }
    println!(
        "  bets     {}..={}",
        config.bet_limits.min_bet, config.bet_limits.max_bet
    );
    Ok(())
}
