//! Per-session win/loss/draw counters.

use serde::{Deserialize, Serialize};

use crate::engine::models::Outcome;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScore {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl SessionScore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished game and return the updated totals.
    pub fn record_outcome(&mut self, outcome: Outcome) -> SessionScore {
        match outcome {
            Outcome::PlayerWin => self.wins += 1,
            Outcome::OpponentWin => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
        tracing::debug!(?outcome, wins = self.wins, losses = self.losses, draws = self.draws, "recorded outcome");
        *self
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
