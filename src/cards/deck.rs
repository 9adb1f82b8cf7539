//! The deck: card order and faces for one session.
//!
//! `Deck` is backed by an `im::Vector`, so handing a copy to a renderer or a
//! snapshot is O(1). `DeckBuilder` allocates card ids and shuffles.
//!
//! ## Usage
//!
//! ```
//! use memory_match::cards::DeckBuilder;
//! use memory_match::core::{GameRng, PokemonId};
//!
//! let mut builder = DeckBuilder::new();
//! let mut rng = GameRng::new(42);
//!
//! let deck = builder.build(&[PokemonId::new(1), PokemonId::new(7)], &mut rng);
//!
//! assert_eq!(deck.len(), 4);
//! assert!(deck.is_well_formed());
//! ```

use im::Vector;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use super::card::{Card, CardFace};
use crate::core::{CardId, GameRng, PokemonId};

/// Ordered cards on the table.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Deck {
    cards: Vector<Card>,
}

impl Deck {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Wrap cards in the given order.
    #[must_use]
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: Vector::from(cards),
        }
    }

    /// Number of cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Is the table empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate cards in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    /// Look up a card.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|card| card.id == id)
    }

    /// Table position of a card.
    #[must_use]
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }

    /// Card at a table position.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    /// Change a card's face. Returns the previous face.
    pub(crate) fn set_face(&mut self, id: CardId, face: CardFace) -> Option<CardFace> {
        let index = self.position(id)?;
        let card = self.cards.get_mut(index)?;
        Some(std::mem::replace(&mut card.face, face))
    }

    /// Cards whose pair has not been found yet.
    pub fn unmatched(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter().filter(|card| !card.is_matched())
    }

    /// Distinct pair keys, in first-seen table order.
    #[must_use]
    pub fn pair_keys(&self) -> Vec<PokemonId> {
        let mut seen = FxHashSet::default();
        self.cards
            .iter()
            .map(|card| card.pair_key)
            .filter(|key| seen.insert(*key))
            .collect()
    }

    /// How many cards carry each pair key.
    #[must_use]
    pub fn pair_counts(&self) -> FxHashMap<PokemonId, usize> {
        let mut counts = FxHashMap::default();
        for card in &self.cards {
            *counts.entry(card.pair_key).or_insert(0) += 1;
        }
        counts
    }

    /// Every pair key appears exactly twice and card ids are unique.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        let ids: FxHashSet<CardId> = self.cards.iter().map(|card| card.id).collect();
        ids.len() == self.cards.len() && self.pair_counts().values().all(|&count| count == 2)
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Card;
    type IntoIter = im::vector::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// Builds shuffled decks with ids that are never reused.
#[derive(Clone, Debug)]
pub struct DeckBuilder {
    next_id: u32,
}

impl Default for DeckBuilder {
    fn default() -> Self {
        Self { next_id: 1 }
    }
}

impl DeckBuilder {
    /// Create a builder whose first card id is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next card will receive.
    #[must_use]
    pub fn next_id(&self) -> CardId {
        CardId::new(self.next_id)
    }

    fn alloc_id(&mut self) -> CardId {
        let id = CardId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Build a shuffled deck with two face-down cards per pair key.
    ///
    /// Repeated keys are ignored after their first occurrence, so the result
    /// always holds exactly two cards per distinct key.
    pub fn build(&mut self, pair_keys: &[PokemonId], rng: &mut GameRng) -> Deck {
        let mut seen = FxHashSet::default();
        let mut cards = Vec::with_capacity(pair_keys.len() * 2);

        for &key in pair_keys {
            if !seen.insert(key) {
                continue;
            }
            cards.push(Card::new(self.alloc_id(), key));
            cards.push(Card::new(self.alloc_id(), key));
        }

        rng.shuffle(&mut cards);
        Deck::from_cards(cards)
    }
}
