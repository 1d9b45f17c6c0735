//! Timed typing test over a catalog of programming quotes.

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::engine::plugin::LabGame;
use crate::engine::store::{record_best, ScoreOrder, ScoreStore};

pub const BEST_SCORE_KEY: &str = "typing-best-wpm";

/// Characters per "word" for WPM purposes.
const CHARS_PER_WORD: f64 = 5.0;

pub const QUOTES: [&str; 10] = [
    "The best way to predict the future is to create it.",
    "Code is like humor. When you have to explain it, it's bad.",
    "First, solve the problem. Then, write the code.",
    "Experience is the name everyone gives to their mistakes.",
    "In order to be irreplaceable, one must always be different.",
    "Java is to JavaScript what car is to carpet.",
    "Programming is the art of telling another human what one wants the computer to do.",
    "The only way to learn a new programming language is by writing programs in it.",
    "Sometimes it pays to stay in bed on Monday, rather than spending the rest of the week debugging Monday's code.",
    "Measuring programming progress by lines of code is like measuring aircraft building progress by weight.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeLimit {
    #[default]
    Thirty,
    Sixty,
}

impl TimeLimit {
    pub fn seconds(self) -> u32 {
        match self {
            TimeLimit::Thirty => 30,
            TimeLimit::Sixty => 60,
        }
    }

    pub fn from_seconds(secs: u32) -> Option<Self> {
        match secs {
            30 => Some(TimeLimit::Thirty),
            60 => Some(TimeLimit::Sixty),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingPhase {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone)]
pub struct TypingTest {
    limit: TimeLimit,
    phase: TypingPhase,
    quote: &'static str,
    input: String,
    time_left: u32,
    wpm: u32,
    accuracy: u32,
}

fn correct_chars(input: &str, quote: &str) -> usize {
    input
        .chars()
        .zip(quote.chars())
        .filter(|(typed, expected)| typed == expected)
        .count()
}

impl TypingTest {
    pub fn new(limit: TimeLimit) -> Self {
        Self {
            limit,
            phase: TypingPhase::Idle,
            quote: "",
            input: String::new(),
            time_left: limit.seconds(),
            wpm: 0,
            accuracy: 100,
        }
    }

    pub fn phase(&self) -> TypingPhase {
        self.phase
    }

    pub fn limit(&self) -> TimeLimit {
        self.limit
    }

    pub fn quote(&self) -> &str {
        self.quote
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn wpm(&self) -> u32 {
        self.wpm
    }

    pub fn accuracy(&self) -> u32 {
        self.accuracy
    }

    /// Only allowed between tests.
    pub fn set_limit(&mut self, limit: TimeLimit) {
        if self.phase == TypingPhase::Running {
            tracing::debug!("time limit change ignored while running");
            return;
        }
        self.limit = limit;
        self.time_left = limit.seconds();
    }

    pub fn start(&mut self, rng: &mut dyn RngCore) {
        *self = Self::new(self.limit);
        self.quote = pick_quote(rng);
        self.phase = TypingPhase::Running;
        tracing::debug!(limit = self.limit.seconds(), "typing test started");
    }

    /// Replace the typed text. Finishing the quote exactly moves on to a
    /// new one with empty input; WPM and accuracy then hold their last
    /// values until typing resumes. Ignored unless the test is running.
    pub fn update_input(&mut self, text: &str, rng: &mut dyn RngCore) {
        if self.phase != TypingPhase::Running {
            return;
        }
        self.input = text.to_string();
        self.recompute();

        if !self.quote.is_empty() && self.input == self.quote {
            self.input.clear();
            self.quote = pick_quote(rng);
        }
    }

    /// One second passes. Returns `true` when this tick ends the test.
    pub fn tick(&mut self, store: &mut dyn ScoreStore) -> bool {
        if self.phase != TypingPhase::Running {
            return false;
        }
        self.time_left = self.time_left.saturating_sub(1);
        self.recompute();

        if self.time_left == 0 {
            self.phase = TypingPhase::Finished;
            tracing::info!(wpm = self.wpm, accuracy = self.accuracy, "typing test finished");
            record_best(store, BEST_SCORE_KEY, i64::from(self.wpm), ScoreOrder::HigherIsBetter);
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.limit);
    }

    /// Counts only the current input against the current quote.
    fn recompute(&mut self) {
        let typed = self.input.chars().count();
        let elapsed = self.limit.seconds() - self.time_left;
        if typed == 0 || elapsed == 0 {
            return;
        }
        let words = typed as f64 / CHARS_PER_WORD;
        let minutes = f64::from(elapsed) / 60.0;
        self.wpm = (words / minutes).round() as u32;

        let correct = correct_chars(&self.input, self.quote);
        self.accuracy = ((correct as f64 / typed as f64) * 100.0).round() as u32;
    }
}

fn pick_quote(rng: &mut dyn RngCore) -> &'static str {
    QUOTES.choose(rng).copied().unwrap_or(QUOTES[0])
}

pub struct TypingPlugin;

impl LabGame for TypingPlugin {
    fn game_id(&self) -> &str { "typing" }
    fn display_name(&self) -> &str { "Typing Test" }
    fn description(&self) -> &str { "Words per minute against the clock, on programming quotes" }

    fn best_score(&self) -> Option<(&'static str, ScoreOrder)> {
        Some((BEST_SCORE_KEY, ScoreOrder::HigherIsBetter))
    }
}
