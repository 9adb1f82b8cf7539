//! Identifier types.
//!
//! - `CardId`: one physical card on the table. Allocated by the deck
//!   builder, never reused for the lifetime of a controller.
//! - `PokemonId`: a catalog entry. Two cards share one per session; it is
//!   the pair key used for matching.
//!
//! ```
//! use memory_match::core::{CardId, PokemonId};
//!
//! let card = CardId::new(3);
//! let key = PokemonId::new(25);
//!
//! assert_eq!(card.raw(), 3);
//! assert_eq!(key.to_string(), "#25");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Catalog identifier; 1-based, as the catalog numbers its entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PokemonId(pub u32);

impl PokemonId {
    /// Create a new catalog ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for PokemonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
