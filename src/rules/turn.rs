//! Turn engine: selection, match evaluation, commit and rollback.
//!
//! `TurnEngine` is a short-lived view over the session state and the deck.
//! The controller builds one per transition, so it is the only path through
//! which cards and counters change.
//!
//! ## Phases
//!
//! - `Idle` → `select` → `OneSelected`
//! - `OneSelected` → `select` → match: back to `Idle` (or terminal on win)
//! - `OneSelected` → `select` → mismatch: `Resolving`
//! - `Resolving` → `resolve_mismatch` → `Idle`
//!
//! The phase is derived from the selection: two selected cards can only
//! survive a transition if they mismatched.

use tracing::{debug, trace};

use super::event::{RejectReason, SelectStatus, TurnError, TurnEvent, TurnEvents, TurnPhase};
use crate::cards::{CardFace, Deck};
use crate::core::CardId;
use crate::session::state::{Outcome, SessionState};

/// Applies turn rules to a session.
///
/// ```
/// use memory_match::cards::Deck;
/// use memory_match::cards::Card;
/// use memory_match::core::{CardId, PokemonId};
/// use memory_match::rules::{TurnEngine, TurnEvent};
/// use memory_match::session::{Outcome, SessionState};
///
/// let mut deck = Deck::from_cards(vec![
///     Card::new(CardId::new(1), PokemonId::new(7)),
///     Card::new(CardId::new(2), PokemonId::new(7)),
/// ]);
/// let mut state = SessionState::new(1);
///
/// let mut engine = TurnEngine::new(&mut state, &mut deck);
/// engine.select(CardId::new(1));
/// let status = engine.select(CardId::new(2));
///
/// assert!(status.events().contains(&TurnEvent::GameWon));
/// assert_eq!(state.outcome, Outcome::Won);
/// ```
pub struct TurnEngine<'a> {
    state: &'a mut SessionState,
    deck: &'a mut Deck,
}

impl<'a> TurnEngine<'a> {
    /// Borrow state and deck for one transition.
    pub fn new(state: &'a mut SessionState, deck: &'a mut Deck) -> Self {
        Self { state, deck }
    }

    /// Phase implied by a session's selection.
    #[must_use]
    pub fn phase_of(state: &SessionState) -> TurnPhase {
        match state.selection.len() {
            0 => TurnPhase::Idle,
            1 => TurnPhase::OneSelected,
            _ => TurnPhase::Resolving,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        Self::phase_of(self.state)
    }

    /// Reveal a card.
    ///
    /// Rejected without any state change when the session is over, a
    /// mismatch is pending, or the card is unknown, matched or already
    /// selected.
    pub fn select(&mut self, card: CardId) -> SelectStatus {
        if let Some(reason) = self.rejection(card) {
            trace!(%card, ?reason, "selection rejected");
            return SelectStatus::Rejected(reason);
        }

        let mut events = TurnEvents::new();
        self.deck.set_face(card, CardFace::FaceUp);
        self.state.counters.clicks += 1;
        self.state.selection.push(card);
        events.push(TurnEvent::CardFlipped {
            card,
            face: CardFace::FaceUp,
        });

        if self.state.selection.len() == 2 {
            self.evaluate(&mut events);
        }

        debug_assert!(self.state.is_consistent());
        SelectStatus::Accepted(events)
    }

    fn rejection(&self, card: CardId) -> Option<RejectReason> {
        if self.state.outcome != Outcome::InProgress {
            return Some(RejectReason::GameOver);
        }
        if self.phase() == TurnPhase::Resolving {
            return Some(RejectReason::Resolving);
        }
        let Some(found) = self.deck.get(card) else {
            return Some(RejectReason::UnknownCard);
        };
        if found.is_matched() {
            return Some(RejectReason::AlreadyMatched);
        }
        if self.state.selection.contains(&card) {
            return Some(RejectReason::AlreadySelected);
        }
        None
    }

    /// Compare the two selected cards and commit a match.
    fn evaluate(&mut self, events: &mut TurnEvents) {
        let (first, second) = (self.state.selection[0], self.state.selection[1]);
        let pair_key = match (self.deck.get(first), self.deck.get(second)) {
            (Some(a), Some(b)) if a.pairs_with(b) => Some(a.pair_key),
            _ => None,
        };

        let Some(pair_key) = pair_key else {
            debug!(%first, %second, "mismatch pending");
            events.push(TurnEvent::MismatchPending { first, second });
            return;
        };

        self.deck.set_face(first, CardFace::Matched);
        self.deck.set_face(second, CardFace::Matched);
        self.state.record_match();
        self.state.selection.clear();
        debug!(%first, %second, %pair_key, pairs_left = self.state.counters.pairs_left, "match found");
        events.push(TurnEvent::MatchFound {
            first,
            second,
            pair_key,
        });

        if self.state.counters.pairs_left == 0 {
            self.state.outcome = Outcome::Won;
            events.push(TurnEvent::GameWon);
        }
    }

    /// Turn a mismatched pair face-down again.
    ///
    /// Only valid while `Resolving`; anything else is a caller bug.
    pub fn resolve_mismatch(&mut self) -> Result<TurnEvents, TurnError> {
        let phase = self.phase();
        if phase != TurnPhase::Resolving {
            return Err(TurnError::InvalidTransition { phase });
        }

        let mut events = TurnEvents::new();
        for card in self.state.selection.drain(..) {
            self.deck.set_face(card, CardFace::FaceDown);
            events.push(TurnEvent::CardFlipped {
                card,
                face: CardFace::FaceDown,
            });
        }
        Ok(events)
    }
}
