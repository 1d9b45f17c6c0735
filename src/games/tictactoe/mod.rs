//! Tic-Tac-Toe board and game state machine.
//!
//! The board is a plain `Copy` array so the minimax search can take a fresh
//! copy per recursion step. `GameState` owns turn order and terminal
//! detection; once a game is won or drawn every further move is ignored.

pub mod session;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::engine::models::{GameStatus, Mark};
use crate::engine::plugin::LabGame;

pub const CELL_COUNT: usize = 9;

pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2], [3, 4, 5], [6, 7, 8], // rows
    [0, 3, 6], [1, 4, 7], [2, 5, 8], // cols
    [0, 4, 8], [2, 4, 6],             // diagonals
];

/// 9 cells in row-major order. `None` is an empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [Option<Mark>; CELL_COUNT],
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(cells: [Option<Mark>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    /// Parse a 9-character layout such as `"XX_OO____"`. Any character other
    /// than `X`/`O` (case-insensitive) is an empty cell.
    pub fn parse(layout: &str) -> Option<Self> {
        let chars: Vec<char> = layout.chars().filter(|c| !c.is_whitespace()).collect();
        if chars.len() != CELL_COUNT {
            return None;
        }
        let mut cells = [None; CELL_COUNT];
        for (cell, ch) in cells.iter_mut().zip(chars) {
            *cell = match ch.to_ascii_uppercase() {
                'X' => Some(Mark::X),
                'O' => Some(Mark::O),
                _ => None,
            };
        }
        Some(Self { cells })
    }

    pub fn cells(&self) -> &[Option<Mark>; CELL_COUNT] {
        &self.cells
    }

    pub fn get(&self, cell: usize) -> Option<Mark> {
        self.cells.get(cell).copied().flatten()
    }

    pub fn is_empty_cell(&self, cell: usize) -> bool {
        matches!(self.cells.get(cell), Some(None))
    }

    /// Place `mark` without any rule checks. Callers pass cells taken from
    /// `empty_cells` or already checked by `GameState::validate_move`;
    /// anything outside the board panics. Public code goes through
    /// `GameState::apply_move`.
    pub(crate) fn with_mark(mut self, cell: usize, mark: Mark) -> Self {
        self.cells[cell] = Some(mark);
        self
    }

    /// Empty cell indices in scan order.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_none())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|c| **c == Some(mark)).count()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    /// The mark owning a complete winning line, if any.
    pub fn check_winner(&self) -> Option<Mark> {
        for line in &WIN_LINES {
            let a = self.cells[line[0]];
            if a.is_some() && a == self.cells[line[1]] && a == self.cells[line[2]] {
                return a;
            }
        }
        None
    }

    pub fn status(&self) -> GameStatus {
        match self.check_winner() {
            Some(mark) => GameStatus::Won(mark),
            None if self.is_full() => GameStatus::Draw,
            None => GameStatus::InProgress,
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            if row > 0 {
                writeln!(f, "---+---+---")?;
            }
            let cells: Vec<String> = (0..3)
                .map(|col| {
                    let idx = row * 3 + col;
                    match self.cells[idx] {
                        Some(m) => m.symbol().to_string(),
                        None => (idx + 1).to_string(),
                    }
                })
                .collect();
            writeln!(f, " {} | {} | {}", cells[0], cells[1], cells[2])?;
        }
        Ok(())
    }
}

/// Why a move was refused. Refused moves leave the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    GameOver,
    NotYourTurn,
    OutOfRange,
    Occupied,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    to_move: Mark,
    status: GameStatus,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    /// Empty board with X to move.
    pub fn new() -> Self {
        Self::starting_with(Mark::X)
    }

    pub fn starting_with(first: Mark) -> Self {
        Self {
            board: Board::new(),
            to_move: first,
            status: GameStatus::InProgress,
        }
    }

    /// Resume from an arbitrary position. Status is derived from the board.
    pub fn from_board(board: Board, to_move: Mark) -> Self {
        Self {
            board,
            to_move,
            status: board.status(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Returns `None` if `mark` may play `cell`, otherwise the reason it may not.
    pub fn validate_move(&self, cell: usize, mark: Mark) -> Option<MoveRejection> {
        if self.is_terminal() {
            return Some(MoveRejection::GameOver);
        }
        if mark != self.to_move {
            return Some(MoveRejection::NotYourTurn);
        }
        if cell >= CELL_COUNT {
            return Some(MoveRejection::OutOfRange);
        }
        if !self.board.is_empty_cell(cell) {
            return Some(MoveRejection::Occupied);
        }
        None
    }

    /// Apply a move, returning the next state. An invalid move returns an
    /// unchanged copy.
    pub fn apply_move(&self, cell: usize, mark: Mark) -> GameState {
        if let Some(reason) = self.validate_move(cell, mark) {
            tracing::debug!(cell, %mark, ?reason, "ignoring move");
            return *self;
        }

        let board = self.board.with_mark(cell, mark);
        let status = board.status();
        if status.is_terminal() {
            tracing::debug!(?status, "game finished");
        }
        GameState {
            board,
            to_move: mark.opponent(),
            status,
        }
    }
}

pub struct TicTacToePlugin;

impl LabGame for TicTacToePlugin {
    fn game_id(&self) -> &str { "tictactoe" }
    fn display_name(&self) -> &str { "Tic-Tac-Toe" }
    fn description(&self) -> &str { "Classic 3x3 against an AI with three difficulty levels" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_flow() {
        let state = GameState::new();
        assert_eq!(state.to_move(), Mark::X);
        assert_eq!(state.board().empty_cells().len(), 9);

        let state = state.apply_move(4, Mark::X);
        assert_eq!(state.board().get(4), Some(Mark::X));
        assert_eq!(state.to_move(), Mark::O);
        assert_eq!(state.status(), GameStatus::InProgress);
    }

    #[test]
    fn test_win_detection() {
        let board = Board::parse("XX_OO____").unwrap();
        let state = GameState::from_board(board, Mark::X);
        let state = state.apply_move(2, Mark::X);
        assert_eq!(state.status(), GameStatus::Won(Mark::X));
    }

    #[test]
    fn test_all_lines_detected() {
        for line in &WIN_LINES {
            let mut cells = [None; CELL_COUNT];
            for &i in line {
                cells[i] = Some(Mark::O);
            }
            assert_eq!(Board::from_cells(cells).check_winner(), Some(Mark::O));
        }
    }

    #[test]
    fn test_full_board_without_line_is_draw() {
        let board = Board::parse("XOXXOOOXX").unwrap();
        assert_eq!(board.check_winner(), None);
        assert_eq!(board.status(), GameStatus::Draw);
    }

    #[test]
    fn test_rejected_moves_are_noops() {
        let state = GameState::new().apply_move(0, Mark::X);

        assert_eq!(state.validate_move(0, Mark::O), Some(MoveRejection::Occupied));
        assert_eq!(state.apply_move(0, Mark::O), state);

        assert_eq!(state.validate_move(1, Mark::X), Some(MoveRejection::NotYourTurn));
        assert_eq!(state.apply_move(1, Mark::X), state);

        assert_eq!(state.validate_move(9, Mark::O), Some(MoveRejection::OutOfRange));
        assert_eq!(state.apply_move(9, Mark::O), state);
    }

    #[test]
    fn test_terminal_state_is_absorbing() {
        let board = Board::parse("XXXOO____").unwrap();
        let state = GameState::from_board(board, Mark::O);
        assert_eq!(state.status(), GameStatus::Won(Mark::X));
        assert_eq!(state.validate_move(5, Mark::O), Some(MoveRejection::GameOver));
        assert_eq!(state.apply_move(5, Mark::O), state);
    }

    #[test]
    fn test_out_of_range_cells_never_panic() {
        let board = Board::parse("X___O____").unwrap();
        assert_eq!(board.get(9), None);
        assert!(!board.is_empty_cell(9));
        assert!(!board.is_empty_cell(usize::MAX));

        let state = GameState::from_board(board, Mark::X);
        assert_eq!(state.apply_move(usize::MAX, Mark::X), state);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(Board::parse("XO").is_none());
        assert!(Board::parse("XOX OXO XOX").is_some());
    }

    #[test]
    fn test_display_numbers_empty_cells() {
        let board = Board::parse("X___O____").unwrap();
        let text = board.to_string();
        assert!(text.starts_with(" X | 2 | 3"));
        assert!(text.contains(" 4 | O | 6"));
    }
}
