pub mod arena;
pub mod bot_profiles;
pub mod bot_strategy;
pub mod error;
pub mod minimax;
pub mod models;
pub mod plugin;
pub mod score;
pub mod stats;
pub mod store;
