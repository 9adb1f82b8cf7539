//! Async hosting for sessions.

pub mod driver;

pub use driver::{Command, SessionDriver};
