//! Bot-vs-bot arena runner for tic-tac-toe strategies.
//!
//! Every game gets its own RNG seeded from `base_seed + game_index`, so a
//! run is reproducible whether games execute sequentially or on the rayon
//! pool.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::{GameStatus, Mark};
use crate::games::tictactoe::GameState;

/// Aggregated results from an arena run.
pub struct ArenaResult {
    pub num_games: usize,
    pub wins: HashMap<String, usize>,
    pub draws: usize,
    pub game_lengths: Vec<usize>,
    pub game_durations_ms: Vec<f64>,
}

/// One finished arena game.
#[derive(Debug, Clone)]
pub struct GameRecord {
    pub x_player: String,
    pub o_player: String,
    pub status: GameStatus,
    pub moves: Vec<usize>,
    pub duration_ms: f64,
}

impl GameRecord {
    pub fn winner(&self) -> Option<&str> {
        match self.status {
            GameStatus::Won(Mark::X) => Some(self.x_player.as_str()),
            GameStatus::Won(Mark::O) => Some(self.o_player.as_str()),
            _ => None,
        }
    }
}

impl ArenaResult {
    pub fn win_rate(&self, name: &str) -> f64 {
        *self.wins.get(name).unwrap_or(&0) as f64 / self.num_games.max(1) as f64
    }

    pub fn draw_rate(&self) -> f64 {
        self.draws as f64 / self.num_games.max(1) as f64
    }

    pub fn avg_game_length(&self) -> f64 {
        if self.game_lengths.is_empty() {
            return 0.0;
        }
        self.game_lengths.iter().sum::<usize>() as f64 / self.game_lengths.len() as f64
    }

    /// Wilson score interval for the win rate.
    pub fn confidence_interval_95(&self, name: &str) -> (f64, f64) {
        let n = self.num_games;
        if n == 0 {
            return (0.0, 0.0);
        }
        let p = self.win_rate(name);
        let z = 1.96_f64;
        let denom = 1.0 + z * z / n as f64;
        let center = (p + z * z / (2.0 * n as f64)) / denom;
        let margin = z * ((p * (1.0 - p) + z * z / (4.0 * n as f64)) / n as f64).sqrt() / denom;
        ((center - margin).max(0.0), (center + margin).min(1.0))
    }

    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Arena Results ({} games)", self.num_games)];
        lines.push("=".repeat(60));
        let mut names: Vec<&String> = self.wins.keys().collect();
        names.sort();
        for name in names {
            let wr = self.win_rate(name);
            let (ci_lo, ci_hi) = self.confidence_interval_95(name);
            lines.push(format!(
                "  {:>12}: {:3} wins ({:5.1}%)  [95% CI: {:.1}%-{:.1}%]",
                name,
                self.wins[name],
                wr * 100.0,
                ci_lo * 100.0,
                ci_hi * 100.0,
            ));
        }
        lines.push(format!("  {:>12}: {} ({:.1}%)", "Draws", self.draws, self.draw_rate() * 100.0));
        lines.push(format!("  Avg length: {:.1} moves", self.avg_game_length()));
        if !self.game_durations_ms.is_empty() {
            let avg_ms = self.game_durations_ms.iter().sum::<f64>() / self.game_durations_ms.len() as f64;
            let total_s = self.game_durations_ms.iter().sum::<f64>() / 1000.0;
            lines.push(format!("  Avg game: {:.1}ms  |  Total: {:.1}s", avg_ms, total_s));
        }
        lines.join("\n")
    }
}

/// Play one game; X moves first.
pub fn play_one_game(
    x: (&str, &dyn BotStrategy),
    o: (&str, &dyn BotStrategy),
    seed: u64,
) -> GameRecord {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut state = GameState::new();
    let mut moves = Vec::with_capacity(9);
    let t0 = Instant::now();

    while !state.is_terminal() {
        let mark = state.to_move();
        let strategy = if mark == Mark::X { x.1 } else { o.1 };
        let cell = match strategy.choose_move(state.board(), mark, &mut rng) {
            Some(c) => c,
            None => break,
        };
        let next = state.apply_move(cell, mark);
        if next == state {
            tracing::warn!(cell, %mark, strategy = strategy.label(), "strategy produced an illegal move");
            break;
        }
        moves.push(cell);
        state = next;
    }

    GameRecord {
        x_player: x.0.to_string(),
        o_player: o.0.to_string(),
        status: state.status(),
        moves,
        duration_ms: t0.elapsed().as_secs_f64() * 1000.0,
    }
}

/// Run `num_games` between exactly two named strategies.
pub fn run_arena(
    strategies: &HashMap<String, Box<dyn BotStrategy>>,
    num_games: usize,
    base_seed: u64,
    alternate_seats: bool,
    parallel: bool,
    progress_callback: Option<&(dyn Fn(usize, usize) + Sync)>,
) -> ArenaResult {
    let mut names: Vec<String> = strategies.keys().cloned().collect();
    names.sort();
    assert_eq!(names.len(), 2, "arena needs exactly two strategies");

    let completed = AtomicUsize::new(0);
    let play = |game_idx: usize| {
        let (x_name, o_name) = if alternate_seats && game_idx % 2 == 1 {
            (&names[1], &names[0])
        } else {
            (&names[0], &names[1])
        };
        let record = play_one_game(
            (x_name.as_str(), strategies[x_name].as_ref()),
            (o_name.as_str(), strategies[o_name].as_ref()),
            base_seed + game_idx as u64,
        );
        let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
        if let Some(cb) = progress_callback {
            cb(done, num_games);
        }
        record
    };

    let records: Vec<GameRecord> = if parallel {
        (0..num_games).into_par_iter().map(play).collect()
    } else {
        (0..num_games).map(play).collect()
    };

    let mut result = ArenaResult {
        num_games,
        wins: names.iter().map(|n| (n.clone(), 0)).collect(),
        draws: 0,
        game_lengths: Vec::with_capacity(num_games),
        game_durations_ms: Vec::with_capacity(num_games),
    };
    for record in &records {
        result.game_lengths.push(record.moves.len());
        result.game_durations_ms.push(record.duration_ms);
        match record.winner() {
            Some(name) => {
                if let Some(w) = result.wins.get_mut(name) {
                    *w += 1;
                }
            }
            None => result.draws += 1,
        }
    }

    tracing::info!(
        games = num_games,
        draws = result.draws,
        wins = ?result.wins,
        "arena run complete"
    );
    result
}
