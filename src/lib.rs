//! # memory-match
//!
//! Session engine for a timed card memory-matching game.
//!
//! A grid of face-down cards hides pairs of catalog images. The player
//! reveals two cards per turn; matching pairs stay up, mismatches turn back
//! after a short delay. Clear the table before the clock runs out.
//!
//! ## Design Principles
//!
//! 1. **One owner**: `SessionController` owns all session state. The turn
//!    engine and the clock are only ever driven through it.
//!
//! 2. **Deterministic**: Every random choice flows from a seeded `GameRng`,
//!    so a seed reproduces a session exactly.
//!
//! 3. **Host-driven time**: The core never sleeps. Hosts call `tick()` once
//!    per second and deliver mismatch resolutions after their delay;
//!    `runtime::SessionDriver` does both on tokio.
//!
//! ## Modules
//!
//! - `core`: Identifiers, RNG, difficulty table and settings
//! - `cards`: Cards, decks, catalog sampling
//! - `rules`: Turn engine and its events
//! - `timer`: Count-up / count-down clock
//! - `session`: Controller, state, renderer notifications
//! - `catalog`: Image catalog providers
//! - `runtime`: Real-time async driver

pub mod core;
pub mod cards;
pub mod rules;
pub mod timer;
pub mod session;
pub mod catalog;
pub mod runtime;

// Re-export commonly used types
pub use crate::core::{CardId, ConfigError, Difficulty, GameRng, PokemonId, SessionConfig, SessionSettings};

pub use crate::cards::{Card, CardFace, Deck, DeckBuilder, RandomCatalogSampler, SampleError};

pub use crate::rules::{RejectReason, SelectStatus, TurnEngine, TurnError, TurnEvent, TurnPhase};

pub use crate::timer::{format_clock, CountdownTimer, TimerEvent, TimerMode};

pub use crate::session::{
    Counters, NullRenderer, Outcome, PendingMismatch, RecordingRenderer, RenderEvent, Renderer,
    SelectOutcome, SessionController, SessionError, SessionSnapshot, SessionState,
};

pub use crate::catalog::{CatalogError, CatalogProvider, PokeApiCatalog, StaticCatalog};

pub use crate::runtime::{Command, SessionDriver};
