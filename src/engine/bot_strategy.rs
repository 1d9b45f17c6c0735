//! Bot strategy trait and implementations.

use rand::seq::SliceRandom;
use rand::{Rng, RngCore};

use crate::engine::minimax::{minimax_search, MinimaxParams};
use crate::engine::models::{Difficulty, Mark};
use crate::games::tictactoe::Board;

/// Default chance that the mixed strategy plays the optimal move.
pub const DEFAULT_OPTIMAL_PROBABILITY: f64 = 0.5;

/// A bot strategy picks an empty cell for `mark` on a non-terminal board.
///
/// Returns `None` only when there is nothing to play (full or already won
/// board); callers never ask in that case.
pub trait BotStrategy: Send + Sync {
    fn choose_move(&self, board: &Board, mark: Mark, rng: &mut dyn RngCore) -> Option<usize>;

    fn label(&self) -> &'static str;
}

/// Picks a uniformly random empty cell.
pub struct RandomStrategy;

impl BotStrategy for RandomStrategy {
    fn choose_move(&self, board: &Board, _mark: Mark, rng: &mut dyn RngCore) -> Option<usize> {
        if board.check_winner().is_some() {
            return None;
        }
        board.empty_cells().choose(rng).copied()
    }

    fn label(&self) -> &'static str {
        "random"
    }
}

/// Exhaustive minimax. Deterministic for a given board and mark.
#[derive(Default)]
pub struct MinimaxStrategy {
    pub params: MinimaxParams,
}

impl MinimaxStrategy {
    pub fn new(params: MinimaxParams) -> Self {
        Self { params }
    }
}

impl BotStrategy for MinimaxStrategy {
    fn choose_move(&self, board: &Board, mark: Mark, _rng: &mut dyn RngCore) -> Option<usize> {
        minimax_search(board, mark, &self.params).map(|r| r.cell)
    }

    fn label(&self) -> &'static str {
        "minimax"
    }
}

/// Flips a coin per move: optimal with `optimal_probability`, random otherwise.
pub struct MixedStrategy {
    pub optimal_probability: f64,
    pub optimal: MinimaxStrategy,
}

impl Default for MixedStrategy {
    fn default() -> Self {
        Self {
            optimal_probability: DEFAULT_OPTIMAL_PROBABILITY,
            optimal: MinimaxStrategy::default(),
        }
    }
}

impl MixedStrategy {
    /// `optimal_probability` clamped to `[0, 1]`. NaN or infinite values
    /// fall back to the default.
    pub fn effective_probability(&self) -> f64 {
        if self.optimal_probability.is_finite() {
            self.optimal_probability.clamp(0.0, 1.0)
        } else {
            DEFAULT_OPTIMAL_PROBABILITY
        }
    }
}

impl BotStrategy for MixedStrategy {
    fn choose_move(&self, board: &Board, mark: Mark, rng: &mut dyn RngCore) -> Option<usize> {
        if rng.gen_bool(self.effective_probability()) {
            self.optimal.choose_move(board, mark, rng)
        } else {
            RandomStrategy.choose_move(board, mark, rng)
        }
    }

    fn label(&self) -> &'static str {
        "mixed"
    }
}

/// Built-in strategy for a difficulty tier: easy is random, medium mixed,
/// hard minimax.
pub fn strategy_for(difficulty: Difficulty) -> Box<dyn BotStrategy> {
    match difficulty {
        Difficulty::Easy => Box::new(RandomStrategy),
        Difficulty::Medium => Box::new(MixedStrategy::default()),
        Difficulty::Hard => Box::new(MinimaxStrategy::default()),
    }
}

/// Choose the computer's move for `mark` at the given difficulty.
pub fn select_move(
    board: &Board,
    mark: Mark,
    difficulty: Difficulty,
    rng: &mut dyn RngCore,
) -> Option<usize> {
    strategy_for(difficulty).choose_move(board, mark, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_only_picks_empty_cells() {
        let board = Board::parse("XOX_O_X__").unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let cell = RandomStrategy.choose_move(&board, Mark::O, &mut rng).unwrap();
            assert!(board.is_empty_cell(cell), "picked occupied cell {}", cell);
        }
    }

    #[test]
    fn test_random_covers_every_empty_cell() {
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = [false; 9];
        for _ in 0..500 {
            seen[RandomStrategy.choose_move(&board, Mark::X, &mut rng).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = Board::parse("XOXXOOOXX").unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        for difficulty in Difficulty::ALL {
            assert_eq!(select_move(&board, Mark::O, difficulty, &mut rng), None);
        }
    }

    #[test]
    fn test_hard_is_deterministic() {
        let board = Board::parse("X___O___X").unwrap();
        let first = select_move(&board, Mark::O, Difficulty::Hard, &mut StdRng::seed_from_u64(1));
        for seed in 2..20 {
            let again = select_move(&board, Mark::O, Difficulty::Hard, &mut StdRng::seed_from_u64(seed));
            assert_eq!(first, again);
        }
    }

    #[test]
    fn test_hard_wins_when_it_can() {
        let board = Board::parse("XX_OO____").unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(select_move(&board, Mark::O, Difficulty::Hard, &mut rng), Some(5));
    }

    #[test]
    fn test_mixed_extremes() {
        let board = Board::parse("XX_OO____").unwrap();
        let mut rng = StdRng::seed_from_u64(11);

        let always = MixedStrategy { optimal_probability: 1.0, ..Default::default() };
        for _ in 0..20 {
            assert_eq!(always.choose_move(&board, Mark::O, &mut rng), Some(5));
        }

        let never = MixedStrategy { optimal_probability: 0.0, ..Default::default() };
        let mut picks = std::collections::HashSet::new();
        for _ in 0..200 {
            picks.insert(never.choose_move(&board, Mark::O, &mut rng).unwrap());
        }
        assert!(picks.len() > 1, "zero-probability mixed play should be random");
    }

    #[test]
    fn test_mixed_survives_non_finite_probability() {
        let board = Board::new();
        let mut rng = StdRng::seed_from_u64(4);
        for p in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let mixed = MixedStrategy { optimal_probability: p, ..Default::default() };
            assert_eq!(mixed.effective_probability(), DEFAULT_OPTIMAL_PROBABILITY);
            let cell = mixed.choose_move(&Board::parse("XX_OO____").unwrap(), Mark::O, &mut rng);
            assert!(cell.is_some());
        }
        let over = MixedStrategy { optimal_probability: 3.0, ..Default::default() };
        assert_eq!(over.effective_probability(), 1.0);
        assert!(over.choose_move(&board, Mark::X, &mut rng).is_some());
    }

    #[test]
    fn test_mixed_default_plays_both_ways() {
        // Optimal always takes the win at 5; random hits another cell 4 times in 5.
        let board = Board::parse("XX_OO____").unwrap();
        let mixed = MixedStrategy::default();
        let mut rng = StdRng::seed_from_u64(5);
        let mut non_optimal = 0;
        for _ in 0..200 {
            if mixed.choose_move(&board, Mark::O, &mut rng) != Some(5) {
                non_optimal += 1;
            }
        }
        assert!(non_optimal > 40 && non_optimal < 130, "got {}", non_optimal);
    }
}
