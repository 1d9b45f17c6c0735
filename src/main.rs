use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use lab_game_engine::engine::bot_profiles::{load_default_profiles, load_profiles, BotProfilesFile};
use lab_game_engine::engine::models::{Difficulty, Mark, Outcome};
use lab_game_engine::engine::store::{JsonFileStore, MemoryStore, ScoreStore};
use lab_game_engine::games::memory::{format_time, MemoryGame};
use lab_game_engine::games::tictactoe::session::TicTacToeSession;
use lab_game_engine::games::typing::{TimeLimit, TypingPhase, TypingTest};
use lab_game_engine::games::GameRegistry;

#[derive(Parser)]
#[command(name = "lab", about = "Play the lab mini-games in the terminal")]
struct Cli {
    /// Path to bot_profiles.toml (default: auto-discover)
    #[arg(long, env = "LAB_BOT_PROFILES", global = true)]
    profiles: Option<PathBuf>,

    /// JSON file keeping best scores between runs (default: this run only)
    #[arg(long, env = "LAB_SCORE_FILE", global = true)]
    score_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available games and stored best scores
    List,

    /// Tic-tac-toe against the computer
    Tictactoe {
        /// easy, medium or hard
        #[arg(short, long, default_value = "medium")]
        difficulty: Difficulty,

        /// Play O and let the computer open
        #[arg(long)]
        second: bool,

        /// Pause before the computer replies
        #[arg(long, default_value = "400", env = "LAB_REPLY_DELAY_MS")]
        reply_delay_ms: u64,
    },

    /// Memory matching game
    Memory,

    /// Typing speed test
    Typing {
        /// Test length in seconds: 30 or 60
        #[arg(long, default_value = "30")]
        seconds: u32,
    },
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Sleep until `due`, or forever when nothing is scheduled.
async fn wait_until(due: Option<Instant>) {
    match due {
        Some(d) => tokio::time::sleep_until(tokio::time::Instant::from_std(d)).await,
        None => std::future::pending::<()>().await,
    }
}

fn open_store(path: Option<&PathBuf>) -> Result<Box<dyn ScoreStore>, Box<dyn std::error::Error>> {
    Ok(match path {
        Some(p) => Box::new(JsonFileStore::open(p)?),
        None => Box::new(MemoryStore::new()),
    })
}

fn list_games(store: &dyn ScoreStore) {
    let registry = GameRegistry::with_builtin_games();
    for game in registry.iter() {
        let best = game
            .best_score()
            .and_then(|(key, _)| store.get(key))
            .map(|v| format!("  (best: {})", v))
            .unwrap_or_default();
        println!("{:<10} {:<12} {}{}", game.game_id(), game.display_name(), game.description(), best);
    }
}

fn render_tictactoe(session: &TicTacToeSession) {
    println!();
    print!("{}", session.state().board());
    let score = session.score();
    println!(
        "[{}] wins {}  losses {}  draws {}",
        session.difficulty(),
        score.wins,
        score.losses,
        score.draws
    );
    match session.outcome() {
        Some(Outcome::PlayerWin) => println!("You win! (n = new game)"),
        Some(Outcome::OpponentWin) => println!("AI wins! (n = new game)"),
        Some(Outcome::Draw) => println!("It's a draw! (n = new game)"),
        None if session.awaiting_player() => {
            println!("You are {}. Cell 1-9, n = new game, easy/medium/hard, q = quit", session.player_mark())
        }
        None => println!("AI is thinking..."),
    }
}

async fn run_tictactoe(
    profiles: &BotProfilesFile,
    difficulty: Difficulty,
    second: bool,
    reply_delay: Duration,
) -> CliResult {
    let mut rng = StdRng::from_entropy();
    let mut session = TicTacToeSession::new(difficulty, profiles.strategy_for(difficulty), reply_delay);
    if second {
        session = session.with_player_mark(Mark::O, Instant::now());
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    render_tictactoe(&session);

    loop {
        let due = session.reply_due();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let cmd = line.trim().to_ascii_lowercase();
                match cmd.as_str() {
                    "q" | "quit" => break,
                    "n" | "new" => session.reset(Instant::now()),
                    "reset-score" => session.reset_score(),
                    other => {
                        if let Ok(d) = other.parse::<Difficulty>() {
                            session.change_difficulty(d, profiles.strategy_for(d), Instant::now());
                        } else if let Ok(n @ 1..=9) = other.parse::<usize>() {
                            if !session.play(n - 1, Instant::now()) {
                                println!("Can't play there right now.");
                            }
                        } else {
                            println!("Unknown command '{}'", other);
                        }
                    }
                }
                render_tictactoe(&session);
            }
            _ = wait_until(due) => {
                if session.poll(Instant::now(), &mut rng).is_some() {
                    render_tictactoe(&session);
                }
            }
        }
    }
    Ok(())
}

fn render_memory(game: &MemoryGame, store: &dyn ScoreStore) {
    println!();
    for row in game.cards().chunks(4) {
        let cells: Vec<String> = row
            .iter()
            .map(|c| {
                if c.face_up || c.matched {
                    format!("{:^4}", c.icon)
                } else {
                    format!("{:^4}", c.id + 1)
                }
            })
            .collect();
        println!("{}", cells.join("|"));
    }
    let best = store
        .get(lab_game_engine::games::memory::BEST_SCORE_KEY)
        .map(|b| format!("  best: {} moves", b))
        .unwrap_or_default();
    println!("moves: {}  time: {}{}", game.moves(), format_time(game.elapsed_secs()), best);
    if game.is_complete() {
        println!("Completed in {} moves and {}! (n = new game)", game.moves(), format_time(game.elapsed_secs()));
    }
}

async fn run_memory(store: &mut dyn ScoreStore) -> CliResult {
    let mut rng = StdRng::from_entropy();
    let mut game = MemoryGame::new(&mut rng);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    render_memory(&game, store);
    println!("Card 1-16 to flip, n = new game, q = quit");

    loop {
        let due = game.resolution_due();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match line.trim() {
                    "q" | "quit" => break,
                    "n" | "new" => game.reset(&mut rng),
                    other => match other.parse::<usize>() {
                        Ok(n) if n >= 1 => {
                            if !game.flip(n - 1, Instant::now()) {
                                println!("Can't flip that card right now.");
                            }
                        }
                        _ => println!("Unknown command '{}'", other),
                    },
                }
                render_memory(&game, store);
            }
            _ = ticker.tick() => game.tick(),
            _ = wait_until(due) => {
                if game.poll(Instant::now(), store) {
                    render_memory(&game, store);
                }
            }
        }
    }
    Ok(())
}

async fn run_typing(store: &mut dyn ScoreStore, limit: TimeLimit) -> CliResult {
    let mut rng = StdRng::from_entropy();
    let mut test = TypingTest::new(limit);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    ticker.tick().await;
    println!("Press Enter to start a {}s test, q to quit.", limit.seconds());

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim() == "q" && test.phase() != TypingPhase::Running {
                    break;
                }
                match test.phase() {
                    TypingPhase::Running => {
                        let before = test.quote().to_string();
                        test.update_input(&line, &mut rng);
                        if test.quote() != before {
                            println!("Nice! Next quote:");
                        }
                        println!("{}s left  {} WPM  {}% accuracy", test.time_left(), test.wpm(), test.accuracy());
                        println!("> {}", test.quote());
                    }
                    TypingPhase::Idle | TypingPhase::Finished => {
                        test.start(&mut rng);
                        ticker.reset();
                        println!("> {}", test.quote());
                    }
                }
            }
            _ = ticker.tick() => {
                if test.tick(store) {
                    let best = store
                        .get(lab_game_engine::games::typing::BEST_SCORE_KEY)
                        .unwrap_or_default();
                    println!("Time! {} WPM, {}% accuracy (best {} WPM). Enter to go again, q to quit.",
                        test.wpm(), test.accuracy(), best);
                }
            }
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> CliResult {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();
    let mut store = open_store(cli.score_file.as_ref())?;

    match cli.command {
        Command::List => list_games(store.as_ref()),
        Command::Tictactoe { difficulty, second, reply_delay_ms } => {
            let profiles = match &cli.profiles {
                Some(path) => load_profiles(path)?,
                None => load_default_profiles(),
            };
            run_tictactoe(&profiles, difficulty, second, Duration::from_millis(reply_delay_ms)).await?;
        }
        Command::Memory => run_memory(store.as_mut()).await?,
        Command::Typing { seconds } => {
            let limit = TimeLimit::from_seconds(seconds)
                .ok_or_else(|| format!("unsupported test length {}s, use 30 or 60", seconds))?;
            run_typing(store.as_mut(), limit).await?;
        }
    }
    Ok(())
}
