pub mod memory;
pub mod tictactoe;
pub mod typing;

use std::collections::BTreeMap;

use crate::engine::plugin::LabGame;

/// Registry of the games available in the lab.
pub struct GameRegistry {
    games: BTreeMap<String, Box<dyn LabGame>>,
}

impl Default for GameRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameRegistry {
    pub fn new() -> Self {
        Self {
            games: BTreeMap::new(),
        }
    }

    /// Registry holding every built-in game.
    pub fn with_builtin_games() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(tictactoe::TicTacToePlugin));
        registry.register(Box::new(memory::MemoryPlugin));
        registry.register(Box::new(typing::TypingPlugin));
        registry
    }

    pub fn register(&mut self, game: Box<dyn LabGame>) {
        let id = game.game_id().to_string();
        self.games.insert(id, game);
    }

    pub fn get(&self, game_id: &str) -> Option<&dyn LabGame> {
        self.games.get(game_id).map(|g| g.as_ref())
    }

    pub fn list_game_ids(&self) -> Vec<String> {
        self.games.keys().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn LabGame> {
        self.games.values().map(|g| g.as_ref())
    }
}
