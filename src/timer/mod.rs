//! Session clock.

pub mod countdown;

pub use countdown::{format_clock, CountdownTimer, TimerEvent, TimerEvents, TimerMode};
