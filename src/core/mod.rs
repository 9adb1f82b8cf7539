//! Core types: identifiers, RNG, configuration.

pub mod config;
pub mod ids;
pub mod rng;

pub use config::{ConfigError, Difficulty, SessionConfig, SessionSettings};
pub use ids::{CardId, PokemonId};
pub use rng::GameRng;
