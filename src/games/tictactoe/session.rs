//! Human-vs-computer session: one game at a time plus the running score.
//!
//! The computer's reply is not applied immediately. After the human moves,
//! the session records a single deadline; the rendering surface calls
//! `poll` once that deadline passes. Resetting or changing difficulty drops
//! the deadline, which is the only cancellation there is.

use std::time::{Duration, Instant};

use rand::RngCore;

use crate::engine::bot_strategy::BotStrategy;
use crate::engine::models::{Difficulty, GameStatus, Mark, Outcome};
use crate::engine::score::SessionScore;
use crate::games::tictactoe::GameState;

pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(400);

pub struct TicTacToeSession {
    state: GameState,
    player: Mark,
    difficulty: Difficulty,
    strategy: Box<dyn BotStrategy>,
    score: SessionScore,
    reply_delay: Duration,
    pending_reply: Option<Instant>,
    recorded: bool,
}

impl TicTacToeSession {
    /// New session with the human playing X (who moves first).
    pub fn new(difficulty: Difficulty, strategy: Box<dyn BotStrategy>, reply_delay: Duration) -> Self {
        Self {
            state: GameState::new(),
            player: Mark::X,
            difficulty,
            strategy,
            score: SessionScore::new(),
            reply_delay,
            pending_reply: None,
            recorded: false,
        }
    }

    /// Let the computer open: the human plays O. Starts a fresh game.
    pub fn with_player_mark(mut self, player: Mark, now: Instant) -> Self {
        self.player = player;
        self.reset(now);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.state.status()
    }

    pub fn player_mark(&self) -> Mark {
        self.player
    }

    pub fn computer_mark(&self) -> Mark {
        self.player.opponent()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn score(&self) -> SessionScore {
        self.score
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.status().outcome_for(self.player)
    }

    /// When the computer's pending reply becomes due, if one is scheduled.
    pub fn reply_due(&self) -> Option<Instant> {
        self.pending_reply
    }

    /// The human may move: game running, their turn, computer not thinking.
    pub fn awaiting_player(&self) -> bool {
        !self.state.is_terminal()
            && self.state.to_move() == self.player
            && self.pending_reply.is_none()
    }

    /// Apply the human's move. Returns `false` (and changes nothing) when
    /// the move is not allowed right now.
    pub fn play(&mut self, cell: usize, now: Instant) -> bool {
        if !self.awaiting_player() {
            tracing::debug!(cell, "input ignored, not the player's turn");
            return false;
        }
        let next = self.state.apply_move(cell, self.player);
        if next == self.state {
            return false;
        }
        self.state = next;
        self.after_move(now);
        true
    }

    /// Apply the computer's reply if it is due. Returns the cell played.
    pub fn poll(&mut self, now: Instant, rng: &mut dyn RngCore) -> Option<usize> {
        let due = self.pending_reply?;
        if now < due {
            return None;
        }
        self.pending_reply = None;

        let mark = self.computer_mark();
        let cell = self.strategy.choose_move(self.state.board(), mark, rng)?;
        tracing::debug!(cell, difficulty = %self.difficulty, strategy = self.strategy.label(), "computer move");
        self.state = self.state.apply_move(cell, mark);
        self.after_move(now);
        Some(cell)
    }

    /// Start a new game. Keeps the score; drops any pending reply.
    pub fn reset(&mut self, now: Instant) {
        self.state = GameState::new();
        self.pending_reply = None;
        self.recorded = false;
        self.schedule_reply_if_needed(now);
    }

    /// Switch difficulty and start a new game.
    pub fn change_difficulty(&mut self, difficulty: Difficulty, strategy: Box<dyn BotStrategy>, now: Instant) {
        tracing::info!(%difficulty, strategy = strategy.label(), "difficulty changed");
        self.difficulty = difficulty;
        self.strategy = strategy;
        self.reset(now);
    }

    pub fn reset_score(&mut self) {
        self.score.reset();
    }

    fn after_move(&mut self, now: Instant) {
        if let Some(outcome) = self.outcome() {
            if !self.recorded {
                self.recorded = true;
                self.score.record_outcome(outcome);
                tracing::info!(?outcome, "game over");
            }
            return;
        }
        self.schedule_reply_if_needed(now);
    }

    fn schedule_reply_if_needed(&mut self, now: Instant) {
        if !self.state.is_terminal() && self.state.to_move() == self.computer_mark() {
            self.pending_reply = Some(now + self.reply_delay);
        }
    }
}
