//! Card system: cards, decks, and catalog sampling.
//!
//! ## Key Types
//!
//! - `Card`: One tile on the table, with its pair key and face
//! - `CardFace`: FaceDown, FaceUp or Matched
//! - `Deck`: Cards in table order
//! - `DeckBuilder`: Allocates card ids and shuffles new decks
//! - `RandomCatalogSampler`: Draws distinct catalog ids for a session

pub mod card;
pub mod deck;
pub mod sampler;

pub use card::{Card, CardFace};
pub use deck::{Deck, DeckBuilder};
pub use sampler::{RandomCatalogSampler, SampleError};
