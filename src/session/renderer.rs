//! Renderer notifications.
//!
//! The controller reports every visible change through `Renderer`. Methods
//! return nothing and default to no-ops, so a renderer implements only what
//! it draws.

use url::Url;

use super::state::{Counters, Outcome};
use crate::cards::{CardFace, Deck};
use crate::core::{CardId, PokemonId};

/// Sink for state-change notifications.
pub trait Renderer {
    /// A new deck was dealt, all cards face-down.
    fn on_deck_built(&mut self, _deck: &Deck) {}

    /// A card turned face-up or back face-down.
    fn on_card_flipped(&mut self, _card: CardId, _face: CardFace) {}

    /// A card's pair was found.
    fn on_card_matched(&mut self, _card: CardId) {}

    fn on_counters_changed(&mut self, _counters: Counters) {}

    /// New clock reading in seconds.
    fn on_time_changed(&mut self, _seconds: u32) {}

    /// The session was won or lost.
    fn on_outcome(&mut self, _outcome: Outcome) {}

    /// The table was cleared.
    fn on_session_reset(&mut self) {}

    /// The catalog returned the image for a pair key.
    fn on_image_resolved(&mut self, _pair_key: PokemonId, _url: &Url) {}

    fn on_theme_changed(&mut self, _theme: &str) {}
}

/// Renderer that draws nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {}

/// One recorded notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RenderEvent {
    DeckBuilt { cards: usize },
    CardFlipped { card: CardId, face: CardFace },
    CardMatched { card: CardId },
    CountersChanged(Counters),
    TimeChanged(u32),
    Outcome(Outcome),
    SessionReset,
    ImageResolved { pair_key: PokemonId, url: String },
    ThemeChanged(String),
}

/// Renderer that records every notification in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingRenderer {
    events: Vec<RenderEvent>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    #[must_use]
    pub fn events(&self) -> &[RenderEvent] {
        &self.events
    }

    /// Take and clear the recorded events.
    pub fn drain(&mut self) -> Vec<RenderEvent> {
        std::mem::take(&mut self.events)
    }

    /// Most recent counters notification.
    #[must_use]
    pub fn last_counters(&self) -> Option<Counters> {
        self.events.iter().rev().find_map(|event| match event {
            RenderEvent::CountersChanged(counters) => Some(*counters),
            _ => None,
        })
    }

    /// Most recent outcome notification.
    #[must_use]
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.events.iter().rev().find_map(|event| match event {
            RenderEvent::Outcome(outcome) => Some(*outcome),
            _ => None,
        })
    }
}

impl Renderer for RecordingRenderer {
    fn on_deck_built(&mut self, deck: &Deck) {
        self.events.push(RenderEvent::DeckBuilt { cards: deck.len() });
    }

    fn on_card_flipped(&mut self, card: CardId, face: CardFace) {
        self.events.push(RenderEvent::CardFlipped { card, face });
    }

    fn on_card_matched(&mut self, card: CardId) {
        self.events.push(RenderEvent::CardMatched { card });
    }

    fn on_counters_changed(&mut self, counters: Counters) {
        self.events.push(RenderEvent::CountersChanged(counters));
    }

    fn on_time_changed(&mut self, seconds: u32) {
        self.events.push(RenderEvent::TimeChanged(seconds));
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        self.events.push(RenderEvent::Outcome(outcome));
    }

    fn on_session_reset(&mut self) {
        self.events.push(RenderEvent::SessionReset);
    }

    fn on_image_resolved(&mut self, pair_key: PokemonId, url: &Url) {
        self.events.push(RenderEvent::ImageResolved {
            pair_key,
            url: url.to_string(),
        });
    }

    fn on_theme_changed(&mut self, theme: &str) {
        self.events.push(RenderEvent::ThemeChanged(theme.to_string()));
    }
}
