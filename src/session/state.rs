//! Session state: counters, selection, clock reading, outcome.
//!
//! Owned by `SessionController`; the turn engine borrows it mutably for the
//! duration of a single transition.
//!
//! Invariant: `pairs_matched + pairs_left == total_pairs` after every
//! transition.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::CardId;

/// How the session ended, if it has.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    /// Is the session over?
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// Message shown to the player.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Outcome::InProgress => "",
            Outcome::Won => "Congratulations! You won the game!",
            Outcome::Lost => "Time is up! You lost the game.",
        }
    }
}

/// Counters shown alongside the grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Counters {
    /// Accepted card selections.
    pub clicks: u32,
    /// Pairs found so far.
    pub pairs_matched: u32,
    /// Pairs still hidden.
    pub pairs_left: u32,
}

/// Cards currently face-up and unresolved (0, 1 or 2).
pub type Selection = SmallVec<[CardId; 2]>;

/// Mutable state of one session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Pair count this state was created for.
    pub total_pairs: u32,

    pub counters: Counters,

    /// Clock reading: seconds remaining when counting down, seconds elapsed
    /// when counting up.
    pub clock: u32,

    pub selection: Selection,

    pub outcome: Outcome,
}

impl SessionState {
    /// Fresh state for a session with `total_pairs` pairs.
    #[must_use]
    pub fn new(total_pairs: u32) -> Self {
        Self {
            total_pairs,
            counters: Counters {
                clicks: 0,
                pairs_matched: 0,
                pairs_left: total_pairs,
            },
            clock: 0,
            selection: Selection::new(),
            outcome: Outcome::InProgress,
        }
    }

    /// Check the pair-count invariant.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.counters.pairs_matched + self.counters.pairs_left == self.total_pairs
            && self.selection.len() <= 2
    }

    /// Record a found pair.
    pub(crate) fn record_match(&mut self) {
        self.counters.pairs_matched += 1;
        self.counters.pairs_left = self.counters.pairs_left.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = SessionState::new(4);
        assert_eq!(state.counters.pairs_left, 4);
        assert_eq!(state.counters.pairs_matched, 0);
        assert_eq!(state.counters.clicks, 0);
        assert_eq!(state.outcome, Outcome::InProgress);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_record_match_keeps_invariant() {
        let mut state = SessionState::new(2);
        state.record_match();
        assert_eq!(state.counters.pairs_matched, 1);
        assert_eq!(state.counters.pairs_left, 1);
        assert!(state.is_consistent());
    }

    #[test]
    fn test_outcome_messages() {
        assert!(!Outcome::InProgress.is_terminal());
        assert!(Outcome::Won.is_terminal());
        assert!(Outcome::Lost.message().contains("Time is up"));
        assert!(Outcome::Won.message().contains("won"));
    }
}
