//! Session configuration.
//!
//! - `Difficulty`: the three selectable levels
//! - `SessionConfig`: pairs and time limit derived from a difficulty
//! - `SessionSettings`: user-facing settings, loadable from TOML
//!
//! The difficulty table in `SessionConfig::for_difficulty` is the only place
//! pair counts and time limits are defined.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selectable difficulty level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// All levels, easiest first.
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Lowercase name, as accepted by `FromStr`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ConfigError::UnknownDifficulty(other.to_string())),
        }
    }
}

/// Per-session configuration, fixed once a session starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Level this config was derived from.
    pub difficulty: Difficulty,

    /// Number of pairs on the table.
    pub total_pairs: u32,

    /// Count-down limit. `None` runs an untimed, count-up clock.
    pub time_limit_seconds: Option<u32>,
}

impl SessionConfig {
    /// Derive the timed configuration for a difficulty.
    ///
    /// | Level  | Pairs | Limit |
    /// |--------|-------|-------|
    /// | Easy   | 4     | 90 s  |
    /// | Medium | 6     | 75 s  |
    /// | Hard   | 10    | 60 s  |
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        let (total_pairs, limit) = match difficulty {
            Difficulty::Easy => (4, 90),
            Difficulty::Medium => (6, 75),
            Difficulty::Hard => (10, 60),
        };
        Self {
            difficulty,
            total_pairs,
            time_limit_seconds: Some(limit),
        }
    }

    /// Same pair count, but no time limit.
    #[must_use]
    pub const fn untimed(mut self) -> Self {
        self.time_limit_seconds = None;
        self
    }

    /// Number of cards on the table.
    #[must_use]
    pub const fn card_count(&self) -> usize {
        self.total_pairs as usize * 2
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
    UnknownDifficulty(String),

    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}

/// User-facing settings.
///
/// ```
/// use memory_match::core::{Difficulty, SessionSettings};
///
/// let settings = SessionSettings::from_toml_str(r#"
///     difficulty = "hard"
///     seed = 7
/// "#).unwrap();
///
/// assert_eq!(settings.difficulty, Difficulty::Hard);
/// assert_eq!(settings.mismatch_delay_ms, 1000);
/// assert!(settings.timed);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// Starting difficulty.
    pub difficulty: Difficulty,

    /// Opaque theme name, passed through to the renderer.
    pub theme: String,

    /// Fixed seed for reproducible decks. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// How long a mismatched pair stays visible.
    pub mismatch_delay_ms: u64,

    /// Count down from the difficulty's limit (`false`: count up, no limit).
    pub timed: bool,

    /// Base URL of the image catalog API.
    pub catalog_base_url: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Easy,
            theme: "light".to_string(),
            seed: None,
            mismatch_delay_ms: 1000,
            timed: true,
            catalog_base_url: "https://pokeapi.co/api/v2".to_string(),
        }
    }
}

impl SessionSettings {
    /// Create default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Set the starting difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Set a fixed seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the theme.
    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = theme.into();
        self
    }

    /// Set the mismatch visibility window.
    #[must_use]
    pub fn with_mismatch_delay_ms(mut self, delay: u64) -> Self {
        self.mismatch_delay_ms = delay;
        self
    }

    /// Switch between count-down and count-up play.
    #[must_use]
    pub fn with_timed(mut self, timed: bool) -> Self {
        self.timed = timed;
        self
    }

    /// Session configuration for a difficulty under these settings.
    #[must_use]
    pub fn session_config(&self, difficulty: Difficulty) -> SessionConfig {
        let config = SessionConfig::for_difficulty(difficulty);
        if self.timed {
            config
        } else {
            config.untimed()
        }
    }

    /// Mismatch visibility window as a `Duration`.
    #[must_use]
    pub fn mismatch_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.mismatch_delay_ms)
    }
}
