//! Game sessions.
//!
//! ## Key Types
//!
//! - `SessionController`: owns and drives a session
//! - `SessionState`: counters, selection, clock reading, outcome
//! - `Renderer`: receives state-change notifications
//! - `SessionSnapshot`: serializable view for redraws

pub mod controller;
pub mod error;
pub mod renderer;
pub mod snapshot;
pub mod state;

pub use controller::{MismatchToken, PendingMismatch, SelectOutcome, SessionController};
pub use error::{Result, SessionError};
pub use renderer::{NullRenderer, RecordingRenderer, RenderEvent, Renderer};
pub use snapshot::SessionSnapshot;
pub use state::{Counters, Outcome, SessionState, Selection};
