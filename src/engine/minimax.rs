//! Exhaustive minimax search for tic-tac-toe.
//!
//! The game tree is at most 9! leaves, so there is no pruning and no
//! transposition table. Boards are `Copy`; every recursion step works on
//! its own copy.

use crate::engine::models::Mark;
use crate::games::tictactoe::Board;

/// Score of a won terminal board before any depth discount.
pub const WIN_SCORE: i32 = 10;

/// Minimax search parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxParams {
    /// Score wins as `WIN_SCORE - plies` and losses as `plies - WIN_SCORE`,
    /// so a faster win beats a slower one. Never changes the sign of a score.
    pub depth_discount: bool,
}

impl Default for MinimaxParams {
    fn default() -> Self {
        Self {
            depth_discount: true,
        }
    }
}

/// Best move found for the side to move, with its minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult {
    pub cell: usize,
    pub score: i32,
    pub nodes: u64,
}

/// Pick the move for `me` that maximises the worst-case score.
///
/// Returns `None` if the board is already won or full. Ties go to the
/// lowest cell index.
pub fn minimax_search(board: &Board, me: Mark, params: &MinimaxParams) -> Option<SearchResult> {
    if board.check_winner().is_some() {
        return None;
    }

    let mut nodes = 0u64;
    let mut best: Option<(usize, i32)> = None;
    for cell in board.empty_cells() {
        let next = board.with_mark(cell, me);
        let score = minimax(&next, me, me.opponent(), 1, params, &mut nodes);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((cell, score)),
        }
    }

    best.map(|(cell, score)| {
        tracing::trace!(cell, score, nodes, "minimax search complete");
        SearchResult { cell, score, nodes }
    })
}

/// Value of `board` for `me`, with `to_move` about to play and `plies`
/// moves already made since the search root.
fn minimax(
    board: &Board,
    me: Mark,
    to_move: Mark,
    plies: i32,
    params: &MinimaxParams,
    nodes: &mut u64,
) -> i32 {
    *nodes += 1;

    if let Some(winner) = board.check_winner() {
        let value = if params.depth_discount {
            WIN_SCORE - plies
        } else {
            WIN_SCORE
        };
        return if winner == me { value } else { -value };
    }

    let empty = board.empty_cells();
    if empty.is_empty() {
        return 0;
    }

    let maximizing = to_move == me;
    let mut best = if maximizing { i32::MIN } else { i32::MAX };
    for cell in empty {
        let next = board.with_mark(cell, to_move);
        let score = minimax(&next, me, to_move.opponent(), plies + 1, params, nodes);
        best = if maximizing { best.max(score) } else { best.min(score) };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(layout: &str, me: Mark, depth_discount: bool) -> SearchResult {
        let board = Board::parse(layout).unwrap();
        minimax_search(&board, me, &MinimaxParams { depth_discount }).unwrap()
    }

    #[test]
    fn test_takes_immediate_win() {
        let result = search("XX_OO____", Mark::O, true);
        assert_eq!(result.cell, 5);
        assert_eq!(result.score, WIN_SCORE - 1);
    }

    #[test]
    fn test_undiscounted_search_prefers_first_forced_win() {
        // Playing 2 blocks X and forks on 5 and 6; without the discount it
        // ties with the immediate win at 5 and wins the scan-order tie-break.
        let result = search("XX_OO____", Mark::O, false);
        assert_eq!(result.cell, 2);
        assert_eq!(result.score, WIN_SCORE);
    }

    #[test]
    fn test_blocks_immediate_threat() {
        let result = search("XX_O_____", Mark::O, true);
        assert_eq!(result.cell, 2);
    }

    #[test]
    fn test_empty_board_is_a_draw() {
        let result = search("_________", Mark::X, true);
        assert_eq!(result.score, 0);
    }

    #[test]
    fn test_terminal_boards_have_no_move() {
        let won = Board::parse("XXXOO____").unwrap();
        assert!(minimax_search(&won, Mark::O, &MinimaxParams::default()).is_none());
        let full = Board::parse("XOXXOOOXX").unwrap();
        assert!(minimax_search(&full, Mark::X, &MinimaxParams::default()).is_none());
    }

    #[test]
    fn test_single_empty_cell() {
        let result = search("XOXXOOOX_", Mark::X, true);
        assert_eq!(result.cell, 8);
        assert_eq!(result.nodes, 1);
    }
}
