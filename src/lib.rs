//! Game logic for the lab mini-games.
//!
//! - `games::tictactoe`: board, state machine and a paced human-vs-computer
//!   session.
//! - `engine::bot_strategy`: random, mixed and minimax move selection.
//! - `games::memory` and `games::typing`: the other two lab games.
//! - `engine::stats`: optimistic site visit/click counter.
//! - `engine::arena`: bot-vs-bot evaluation.

pub mod engine;
pub mod games;
