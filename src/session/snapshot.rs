//! Read-only view of a session for renderers and logs.

use serde::Serialize;

use super::state::{Counters, Outcome};
use crate::cards::Deck;
use crate::core::SessionConfig;
use crate::rules::TurnPhase;

/// Everything a renderer needs to redraw from scratch.
///
/// The deck shares structure with the live session, so taking a snapshot is
/// cheap.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub config: SessionConfig,
    pub counters: Counters,
    pub clock: u32,
    pub outcome: Outcome,
    pub phase: TurnPhase,
    pub timer_running: bool,
    pub theme: String,
    pub deck: Deck,
}
