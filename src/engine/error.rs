//! Error types for the fallible edges of the engine: configuration, score
//! persistence and the statistics backend. Game operations never fail.

use std::path::PathBuf;

use derive_more::{Display, Error};

/// Configuration and persistence errors.
#[derive(Debug, Display, Error)]
pub enum LabError {
    #[display("failed to read {}: {}", path.display(), source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[display("failed to parse {}: {}", path.display(), source)]
    ProfileParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[display("corrupt score file {}: {}", path.display(), source)]
    ScoreFile {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[display("profile '{}' not found", name)]
    UnknownProfile {
        name: String,
    },
}

/// Failures reported by a statistics backend.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum StatsError {
    /// The backend answered but refused the operation.
    #[display("{} rejected: {}", operation, message)]
    Rejected {
        operation: &'static str,
        message: String,
    },

    /// The call never completed (network failure, timeout).
    #[display("transport failure: {}", message)]
    Transport {
        message: String,
    },
}
