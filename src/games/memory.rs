//! Memory matching game: 8 icon pairs, fewest flips wins.
//!
//! A second face-up card schedules a resolution instead of resolving at
//! once, so the player gets to see both cards. Matches resolve faster than
//! misses.

use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::RngCore;
use serde::Serialize;

use crate::engine::plugin::LabGame;
use crate::engine::store::{record_best, ScoreOrder, ScoreStore};

pub const ICONS: [&str; 8] = ["🐍", "🗃️", "⚛️", "📊", "🤖", "☁️", "🔥", "💾"];
pub const BEST_SCORE_KEY: &str = "memory-best-score";
pub const MATCH_DELAY: Duration = Duration::from_millis(300);
pub const MISMATCH_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    pub id: usize,
    pub icon: &'static str,
    pub face_up: bool,
    pub matched: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPair {
    first: usize,
    second: usize,
    is_match: bool,
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct MemoryGame {
    cards: Vec<Card>,
    face_up: Vec<usize>,
    pending: Option<PendingPair>,
    moves: u32,
    elapsed_secs: u32,
    playing: bool,
    complete: bool,
}

/// Both copies of every icon, shuffled.
pub fn deal(rng: &mut dyn RngCore) -> Vec<Card> {
    let mut icons: Vec<&'static str> = ICONS.iter().chain(ICONS.iter()).copied().collect();
    icons.shuffle(rng);
    icons
        .into_iter()
        .enumerate()
        .map(|(id, icon)| Card {
            id,
            icon,
            face_up: false,
            matched: false,
        })
        .collect()
}

/// `m:ss`
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

impl MemoryGame {
    pub fn new(rng: &mut dyn RngCore) -> Self {
        Self::with_cards(deal(rng))
    }

    pub fn with_cards(cards: Vec<Card>) -> Self {
        Self {
            cards,
            face_up: Vec::new(),
            pending: None,
            moves: 0,
            elapsed_secs: 0,
            playing: false,
            complete: false,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// When the face-up pair will be resolved, if one is waiting.
    pub fn resolution_due(&self) -> Option<Instant> {
        self.pending.map(|p| p.due)
    }

    pub fn can_flip(&self, id: usize) -> bool {
        !self.complete
            && self.face_up.len() < 2
            && self
                .cards
                .get(id)
                .map(|c| !c.face_up && !c.matched)
                .unwrap_or(false)
    }

    /// Turn a card face up. Each accepted flip is one move; the first one
    /// starts the clock. Returns whether the flip was accepted.
    pub fn flip(&mut self, id: usize, now: Instant) -> bool {
        if !self.can_flip(id) {
            tracing::debug!(card = id, "flip ignored");
            return false;
        }
        self.playing = true;
        self.cards[id].face_up = true;
        self.face_up.push(id);
        self.moves += 1;

        if let [first, second] = self.face_up[..] {
            let is_match = self.cards[first].icon == self.cards[second].icon;
            let delay = if is_match { MATCH_DELAY } else { MISMATCH_DELAY };
            self.pending = Some(PendingPair {
                first,
                second,
                is_match,
                due: now + delay,
            });
        }
        true
    }

    /// Resolve the face-up pair if its delay has passed. On the final match
    /// the game completes and the move count is offered to `store`.
    /// Returns whether a pair was resolved.
    pub fn poll(&mut self, now: Instant, store: &mut dyn ScoreStore) -> bool {
        let pending = match self.pending {
            Some(p) if now >= p.due => p,
            _ => return false,
        };
        self.pending = None;
        self.face_up.clear();

        for id in [pending.first, pending.second] {
            if pending.is_match {
                self.cards[id].matched = true;
            } else {
                self.cards[id].face_up = false;
            }
        }

        if self.playing && self.cards.iter().all(|c| c.matched) {
            self.complete = true;
            self.playing = false;
            tracing::info!(moves = self.moves, secs = self.elapsed_secs, "memory game complete");
            record_best(store, BEST_SCORE_KEY, i64::from(self.moves), ScoreOrder::LowerIsBetter);
        }
        true
    }

    /// One second of play time.
    pub fn tick(&mut self) {
        if self.playing && !self.complete {
            self.elapsed_secs += 1;
        }
    }

    pub fn reset(&mut self, rng: &mut dyn RngCore) {
        *self = Self::new(rng);
    }
}

pub struct MemoryPlugin;

impl LabGame for MemoryPlugin {
    fn game_id(&self) -> &str { "memory" }
    fn display_name(&self) -> &str { "Memory Game" }
    fn description(&self) -> &str { "Match all pairs with the fewest moves" }

    fn best_score(&self) -> Option<(&'static str, ScoreOrder)> {
        Some((BEST_SCORE_KEY, ScoreOrder::LowerIsBetter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Cards laid out in pairs: 0-1, 2-3, ...
    fn ordered_game() -> MemoryGame {
        let cards = ICONS
            .iter()
            .flat_map(|icon| [*icon, *icon])
            .enumerate()
            .map(|(id, icon)| Card { id, icon, face_up: false, matched: false })
            .collect();
        MemoryGame::with_cards(cards)
    }

    #[test]
    fn test_deal_has_every_icon_twice() {
        let mut rng = StdRng::seed_from_u64(4);
        let cards = deal(&mut rng);
        assert_eq!(cards.len(), 16);
        for icon in ICONS {
            assert_eq!(cards.iter().filter(|c| c.icon == icon).count(), 2);
        }
        assert!(cards.iter().enumerate().all(|(i, c)| c.id == i));
    }

    #[test]
    fn test_match_resolves_after_short_delay() {
        let mut game = ordered_game();
        let mut store = MemoryStore::new();
        let t0 = Instant::now();

        assert!(game.flip(0, t0));
        assert!(game.is_playing());
        assert!(game.flip(1, t0));
        assert_eq!(game.resolution_due(), Some(t0 + MATCH_DELAY));

        assert!(!game.poll(t0 + Duration::from_millis(100), &mut store));
        assert!(game.poll(t0 + MATCH_DELAY, &mut store));
        assert!(game.cards()[0].matched && game.cards()[1].matched);
        assert_eq!(game.moves(), 2);
    }

    #[test]
    fn test_mismatch_flips_back() {
        let mut game = ordered_game();
        let mut store = MemoryStore::new();
        let t0 = Instant::now();

        game.flip(0, t0);
        game.flip(2, t0);
        assert_eq!(game.resolution_due(), Some(t0 + MISMATCH_DELAY));

        // A third card cannot be flipped while the pair is showing.
        assert!(!game.flip(4, t0));

        assert!(game.poll(t0 + MISMATCH_DELAY, &mut store));
        assert!(!game.cards()[0].face_up && !game.cards()[2].face_up);
        assert!(!game.cards()[0].matched);
        assert!(game.can_flip(4));
    }

    #[test]
    fn test_invalid_flips_ignored() {
        let mut game = ordered_game();
        let t0 = Instant::now();
        assert!(!game.flip(99, t0));
        assert!(game.flip(3, t0));
        assert!(!game.flip(3, t0));
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn test_completion_records_best_score() {
        let mut store = MemoryStore::new();
        let mut now = Instant::now();

        let mut game = ordered_game();
        for pair in 0..8 {
            game.flip(pair * 2, now);
            game.flip(pair * 2 + 1, now);
            now += MATCH_DELAY;
            game.poll(now, &mut store);
        }
        assert!(game.is_complete());
        assert!(!game.is_playing());
        assert_eq!(game.moves(), 16);
        assert_eq!(store.get(BEST_SCORE_KEY), Some(16));

        // A worse game leaves the best score alone.
        let mut worse = ordered_game();
        worse.flip(0, now);
        worse.flip(2, now);
        now += MISMATCH_DELAY;
        worse.poll(now, &mut store);
        for pair in 0..8 {
            worse.flip(pair * 2, now);
            worse.flip(pair * 2 + 1, now);
            now += MATCH_DELAY;
            worse.poll(now, &mut store);
        }
        assert!(worse.is_complete());
        assert_eq!(worse.moves(), 18);
        assert_eq!(store.get(BEST_SCORE_KEY), Some(16));
    }

    #[test]
    fn test_clock_runs_only_while_playing() {
        let mut game = ordered_game();
        game.tick();
        assert_eq!(game.elapsed_secs(), 0);
        game.flip(0, Instant::now());
        game.tick();
        game.tick();
        assert_eq!(game.elapsed_secs(), 2);
    }

    #[test]
    fn test_clock_stops_after_completion() {
        let mut store = MemoryStore::new();
        let mut now = Instant::now();
        let mut game = ordered_game();
        for pair in 0..8 {
            game.flip(pair * 2, now);
            game.flip(pair * 2 + 1, now);
            game.tick();
            now += MATCH_DELAY;
            game.poll(now, &mut store);
        }
        assert!(game.is_complete());
        assert_eq!(game.elapsed_secs(), 8);

        game.tick();
        game.tick();
        assert_eq!(game.elapsed_secs(), 8);
        assert!(!game.flip(0, now));
        assert_eq!(game.moves(), 16);
    }

    #[test]
    fn test_reset_while_pair_showing() {
        let mut rng = StdRng::seed_from_u64(6);
        let mut store = MemoryStore::new();
        let t0 = Instant::now();
        let mut game = ordered_game();
        game.flip(0, t0);
        game.flip(2, t0);
        game.tick();
        assert!(game.resolution_due().is_some());

        game.reset(&mut rng);
        assert_eq!(game.resolution_due(), None);
        assert_eq!(game.moves(), 0);
        assert_eq!(game.elapsed_secs(), 0);
        assert!(!game.is_playing());
        assert!(game.cards().iter().all(|c| !c.face_up && !c.matched));

        // The stale pair never resolves against the new deck.
        assert!(!game.poll(t0 + MISMATCH_DELAY, &mut store));

        // A fresh pair can be flipped straight away.
        assert!(game.flip(5, t0));
        assert!(game.flip(9, t0));
        assert_eq!(game.moves(), 2);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "0:00");
        assert_eq!(format_time(65), "1:05");
        assert_eq!(format_time(600), "10:00");
    }
}
