//! Turn events and selection results.
//!
//! The turn engine never calls out to anything. It reports what happened as
//! a batch of `TurnEvent`s, and the controller turns those into counter
//! updates, timer control and renderer notifications.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::cards::CardFace;
use crate::core::{CardId, PokemonId};

/// Selection phase of the turn engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No card selected.
    Idle,
    /// One card face-up.
    OneSelected,
    /// Two mismatched cards face-up, waiting for `resolve_mismatch`.
    Resolving,
}

/// Something that happened during a turn transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A card changed face.
    CardFlipped { card: CardId, face: CardFace },

    /// Two selected cards share a pair key and are now matched.
    MatchFound {
        first: CardId,
        second: CardId,
        pair_key: PokemonId,
    },

    /// Two selected cards differ; they stay visible until resolved.
    MismatchPending { first: CardId, second: CardId },

    /// The last pair was found.
    GameWon,
}

/// Events from one transition. Rarely more than four.
pub type TurnEvents = SmallVec<[TurnEvent; 4]>;

/// Why a selection was ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectReason {
    /// The session is won or lost.
    GameOver,
    /// Two cards are still waiting to be turned back.
    Resolving,
    /// The card is not on the table.
    UnknownCard,
    /// The card's pair was already found.
    AlreadyMatched,
    /// The card is the one already face-up.
    AlreadySelected,
}

/// Result of `TurnEngine::select`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectStatus {
    /// The card was flipped; events describe the consequences.
    Accepted(TurnEvents),
    /// Nothing changed.
    Rejected(RejectReason),
}

impl SelectStatus {
    /// Was the selection accepted?
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, SelectStatus::Accepted(_))
    }

    /// Events of an accepted selection (empty when rejected).
    #[must_use]
    pub fn events(&self) -> &[TurnEvent] {
        match self {
            SelectStatus::Accepted(events) => events,
            SelectStatus::Rejected(_) => &[],
        }
    }
}

/// Misuse of the turn engine by its caller.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TurnError {
    #[error("resolve_mismatch called in phase {phase:?}, expected Resolving")]
    InvalidTransition { phase: TurnPhase },
}
