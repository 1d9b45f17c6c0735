//! LabGame trait: catalog metadata every lab game exposes.

use crate::engine::store::ScoreOrder;

pub trait LabGame: Send + Sync {
    fn game_id(&self) -> &str;
    fn display_name(&self) -> &str;
    fn description(&self) -> &str;

    /// Store key and ordering of the game's persisted best score, for games
    /// that keep one.
    fn best_score(&self) -> Option<(&'static str, ScoreOrder)> {
        None
    }
}
