//! Named bot profiles: which strategy a difficulty tier plays and how.
//! Loaded from TOML at runtime for the lab and arena CLIs.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::engine::bot_strategy::{
    strategy_for, BotStrategy, MinimaxStrategy, MixedStrategy, RandomStrategy,
    DEFAULT_OPTIMAL_PROBABILITY,
};
use crate::engine::error::LabError;
use crate::engine::minimax::MinimaxParams;
use crate::engine::models::Difficulty;

/// A named bot profile. Unset fields fall back to the built-in defaults.
#[derive(Debug, Deserialize, Clone)]
pub struct BotProfile {
    pub description: Option<String>,
    #[serde(default = "default_strategy_type")]
    pub strategy_type: String,

    /// Chance of an optimal move for `mixed` profiles.
    pub optimal_probability: Option<f64>,
    /// Prefer faster wins in the minimax search.
    pub depth_discount: Option<bool>,
}

fn default_strategy_type() -> String {
    "minimax".into()
}

/// Maps difficulty tiers to profile names.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProductionConfig {
    pub easy: Option<String>,
    pub medium: Option<String>,
    pub hard: Option<String>,
}

impl ProductionConfig {
    pub fn resolve(&self, difficulty: Difficulty) -> Option<&str> {
        match difficulty {
            Difficulty::Easy => self.easy.as_deref(),
            Difficulty::Medium => self.medium.as_deref(),
            Difficulty::Hard => self.hard.as_deref(),
        }
    }
}

/// Top-level TOML file structure.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BotProfilesFile {
    #[serde(default)]
    pub profiles: HashMap<String, BotProfile>,
    #[serde(default)]
    pub production: ProductionConfig,
}

impl BotProfile {
    pub fn to_minimax_params(&self) -> MinimaxParams {
        let d = MinimaxParams::default();
        MinimaxParams {
            depth_discount: self.depth_discount.unwrap_or(d.depth_discount),
        }
    }

    /// `optimal_probability`, or the default when unset or outside `[0, 1]`
    /// (NaN included).
    pub fn checked_optimal_probability(&self) -> f64 {
        match self.optimal_probability {
            None => DEFAULT_OPTIMAL_PROBABILITY,
            Some(p) if (0.0..=1.0).contains(&p) => p,
            Some(p) => {
                tracing::warn!(
                    optimal_probability = p,
                    fallback = DEFAULT_OPTIMAL_PROBABILITY,
                    "optimal_probability must be within 0..=1, using default"
                );
                DEFAULT_OPTIMAL_PROBABILITY
            }
        }
    }

    /// Build the strategy this profile describes. Unknown strategy types
    /// fall back to minimax with a warning.
    pub fn build_strategy(&self) -> Box<dyn BotStrategy> {
        let params = self.to_minimax_params();
        match self.strategy_type.as_str() {
            "random" => Box::new(RandomStrategy),
            "mixed" => Box::new(MixedStrategy {
                optimal_probability: self.checked_optimal_probability(),
                optimal: MinimaxStrategy::new(params),
            }),
            "minimax" => Box::new(MinimaxStrategy::new(params)),
            other => {
                tracing::warn!(strategy_type = other, "unknown strategy type, using minimax");
                Box::new(MinimaxStrategy::new(params))
            }
        }
    }
}

impl BotProfilesFile {
    /// Look up a profile by name.
    pub fn profile(&self, name: &str) -> Result<&BotProfile, LabError> {
        self.profiles.get(name).ok_or_else(|| LabError::UnknownProfile {
            name: name.to_string(),
        })
    }

    /// Strategy for a difficulty tier: the mapped profile when one is
    /// configured and present, otherwise the built-in default.
    pub fn strategy_for(&self, difficulty: Difficulty) -> Box<dyn BotStrategy> {
        if let Some(name) = self.production.resolve(difficulty) {
            match self.profiles.get(name) {
                Some(profile) => return profile.build_strategy(),
                None => {
                    tracing::warn!(%difficulty, profile = name, "production profile missing, using built-in");
                }
            }
        }
        strategy_for(difficulty)
    }
}

/// Parse profiles from TOML text.
pub fn parse_profiles(content: &str, path: &Path) -> Result<BotProfilesFile, LabError> {
    toml::from_str(content).map_err(|source| LabError::ProfileParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Load profiles from a TOML file at the given path.
pub fn load_profiles(path: &Path) -> Result<BotProfilesFile, LabError> {
    let content = std::fs::read_to_string(path).map_err(|source| LabError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_profiles(&content, path)
}

/// Try to load profiles from well-known paths, returning a default if none found.
pub fn load_default_profiles() -> BotProfilesFile {
    let candidates = [
        "bot_profiles.toml",
        "../bot_profiles.toml",
        "/etc/lab/bot_profiles.toml",
    ];
    for path in &candidates {
        let p = Path::new(path);
        if p.exists() {
            match load_profiles(p) {
                Ok(profiles) => {
                    tracing::info!(path = %p.display(), count = profiles.profiles.len(), "loaded bot profiles");
                    return profiles;
                }
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "failed to load bot profiles");
                }
            }
        }
    }
    tracing::info!("no bot_profiles.toml found, using built-in defaults");
    BotProfilesFile::default()
}
