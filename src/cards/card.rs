//! Card instances - runtime card state.
//!
//! A `Card` is one tile on the table. It knows its pair key and which face
//! is showing; nothing else about the card changes during a session.

use serde::{Deserialize, Serialize};

use crate::core::{CardId, PokemonId};

/// Which side of a card is visible.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardFace {
    /// Hidden; the back is showing.
    #[default]
    FaceDown,
    /// Revealed as part of the current selection.
    FaceUp,
    /// Revealed permanently after its partner was found.
    Matched,
}

impl CardFace {
    /// Is the image visible?
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, CardFace::FaceDown)
    }
}

/// A card on the table.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// Unique id for this card.
    pub id: CardId,

    /// Catalog entry shown on the front. Shared with exactly one other card.
    pub pair_key: PokemonId,

    /// Current face.
    pub face: CardFace,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub fn new(id: CardId, pair_key: PokemonId) -> Self {
        Self {
            id,
            pair_key,
            face: CardFace::FaceDown,
        }
    }

    /// Has this card's pair been found?
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.face == CardFace::Matched
    }

    /// Do the two cards form a pair? A card never pairs with itself.
    #[must_use]
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.id != other.id && self.pair_key == other.pair_key
    }
}
