//! Turn rules.
//!
//! - `TurnEngine`: applies a selection or a mismatch rollback
//! - `TurnEvent`: what a transition did
//! - `SelectStatus` / `RejectReason`: accepted or ignored input

pub mod event;
pub mod turn;

pub use event::{RejectReason, SelectStatus, TurnError, TurnEvent, TurnEvents, TurnPhase};
pub use turn::TurnEngine;
