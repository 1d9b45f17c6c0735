//! Arena CLI: run bot-vs-bot tic-tac-toe experiments from the command line.
//!
//! Usage:
//!   cargo run --release --bin arena -- --games 200 --p1-profile hard --p2-profile easy
//!   cargo run --release --bin arena -- --games 500 --p1-difficulty medium --p2-type mixed --p2-optimal-probability 0.8

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{ArgAction, Parser};

use lab_game_engine::engine::arena::run_arena;
use lab_game_engine::engine::bot_profiles::{load_default_profiles, load_profiles, BotProfile, BotProfilesFile};
use lab_game_engine::engine::bot_strategy::BotStrategy;
use lab_game_engine::engine::models::Difficulty;

#[derive(Parser)]
#[command(name = "arena", about = "Run bot-vs-bot arena experiments for tic-tac-toe")]
struct Cli {
    /// Number of games to play
    #[arg(long, default_value = "100")]
    games: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Alternate who plays X between games (`--alternate-seats false` keeps one player on X)
    #[arg(long, action = ArgAction::Set, default_value_t = true)]
    alternate_seats: bool,

    /// Spread games over all cores
    #[arg(long)]
    parallel: bool,

    /// Path to bot_profiles.toml
    #[arg(long, env = "LAB_BOT_PROFILES")]
    profiles: Option<PathBuf>,

    // --- Player 1 ---
    /// P1 display name
    #[arg(long, default_value = "p1")]
    p1_name: String,

    /// P1 profile name (from bot_profiles.toml)
    #[arg(long)]
    p1_profile: Option<String>,

    /// P1 difficulty tier, resolved through the [production] table
    #[arg(long)]
    p1_difficulty: Option<Difficulty>,

    /// P1 strategy type: "random", "mixed" or "minimax"
    #[arg(long, default_value = "minimax")]
    p1_type: String,

    /// P1 optimal-move probability for mixed strategies
    #[arg(long)]
    p1_optimal_probability: Option<f64>,

    /// P1 disables the depth discount in minimax
    #[arg(long)]
    p1_no_depth_discount: bool,

    // --- Player 2 ---
    /// P2 display name
    #[arg(long, default_value = "p2")]
    p2_name: String,

    /// P2 profile name (from bot_profiles.toml)
    #[arg(long)]
    p2_profile: Option<String>,

    /// P2 difficulty tier, resolved through the [production] table
    #[arg(long)]
    p2_difficulty: Option<Difficulty>,

    /// P2 strategy type: "random", "mixed" or "minimax"
    #[arg(long, default_value = "random")]
    p2_type: String,

    /// P2 optimal-move probability for mixed strategies
    #[arg(long)]
    p2_optimal_probability: Option<f64>,

    /// P2 disables the depth discount in minimax
    #[arg(long)]
    p2_no_depth_discount: bool,
}

struct PlayerArgs<'a> {
    name: &'a str,
    profile: Option<&'a str>,
    difficulty: Option<Difficulty>,
    strategy_type: &'a str,
    optimal_probability: Option<f64>,
    no_depth_discount: bool,
}

struct PlayerConfig {
    name: String,
    profile: BotProfile,
}

fn build_player_config(args: &PlayerArgs<'_>, profiles: &BotProfilesFile) -> PlayerConfig {
    let named = args
        .profile
        .or_else(|| args.difficulty.and_then(|d| profiles.production.resolve(d)));

    // Start from the named profile if there is one
    let (mut profile, default_name) = match named {
        Some(prof_name) => {
            let profile = profiles.profile(prof_name).unwrap_or_else(|e| {
                eprintln!("Error: {}", e);
                eprintln!("Available profiles: {:?}", profiles.profiles.keys().collect::<Vec<_>>());
                std::process::exit(1);
            });
            (profile.clone(), prof_name.to_string())
        }
        None => {
            let strategy_type = match args.difficulty {
                Some(Difficulty::Easy) => "random",
                Some(Difficulty::Medium) => "mixed",
                Some(Difficulty::Hard) => "minimax",
                None => args.strategy_type,
            };
            let profile = BotProfile {
                description: None,
                strategy_type: strategy_type.to_string(),
                optimal_probability: None,
                depth_discount: None,
            };
            (profile, args.name.to_string())
        }
    };

    // CLI overrides on top of profile
    if let Some(p) = args.optimal_probability {
        profile.optimal_probability = Some(p);
    }
    if args.no_depth_discount {
        profile.depth_discount = Some(false);
    }

    let name = if args.name == "p1" || args.name == "p2" {
        default_name
    } else {
        args.name.to_string()
    };
    PlayerConfig { name, profile }
}

fn print_config(config: &PlayerConfig) {
    let params = config.profile.to_minimax_params();
    eprintln!(
        "  {}: type={}, optimal_probability={}, depth_discount={}",
        config.name,
        config.profile.strategy_type,
        config
            .profile
            .optimal_probability
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".into()),
        params.depth_discount,
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let profiles = match &cli.profiles {
        Some(path) => load_profiles(path).unwrap_or_else(|e| {
            eprintln!("Error loading profiles: {}", e);
            std::process::exit(1);
        }),
        None => load_default_profiles(),
    };

    let mut p1_config = build_player_config(
        &PlayerArgs {
            name: &cli.p1_name,
            profile: cli.p1_profile.as_deref(),
            difficulty: cli.p1_difficulty,
            strategy_type: &cli.p1_type,
            optimal_probability: cli.p1_optimal_probability,
            no_depth_discount: cli.p1_no_depth_discount,
        },
        &profiles,
    );
    let mut p2_config = build_player_config(
        &PlayerArgs {
            name: &cli.p2_name,
            profile: cli.p2_profile.as_deref(),
            difficulty: cli.p2_difficulty,
            strategy_type: &cli.p2_type,
            optimal_probability: cli.p2_optimal_probability,
            no_depth_discount: cli.p2_no_depth_discount,
        },
        &profiles,
    );
    // Same profile on both sides still needs two entries
    if p1_config.name == p2_config.name {
        p1_config.name.push_str("_1");
        p2_config.name.push_str("_2");
    }

    eprintln!(
        "Arena: {} games, seed={}, alternate_seats={}, parallel={}",
        cli.games, cli.seed, cli.alternate_seats, cli.parallel
    );
    print_config(&p1_config);
    print_config(&p2_config);
    eprintln!();

    let mut strategies: HashMap<String, Box<dyn BotStrategy>> = HashMap::new();
    strategies.insert(p1_config.name.clone(), p1_config.profile.build_strategy());
    strategies.insert(p2_config.name.clone(), p2_config.profile.build_strategy());

    let total = cli.games;
    let progress_cb = move |done: usize, _total: usize| {
        if done % 10 == 0 || done == total {
            eprint!("\r  [{}/{}] games completed", done, total);
        }
    };

    let result = run_arena(
        &strategies,
        cli.games,
        cli.seed,
        cli.alternate_seats,
        cli.parallel,
        Some(&progress_cb),
    );

    eprintln!("\r                                    "); // clear progress line
    println!("{}", result.summary());
}
