//! Cooperative one-second clock.
//!
//! The timer does not own a thread or an interval. Its host calls `tick()`
//! once per wall-clock second while it is running; each call reports what a
//! callback-based timer would have fired.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Counting direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerMode {
    /// Elapsed seconds, no expiry.
    CountUp,
    /// Remaining seconds from `limit`, expires at zero.
    CountDown { limit: u32 },
}

impl TimerMode {
    /// Count down when a limit is configured, otherwise count up.
    #[must_use]
    pub const fn for_limit(limit: Option<u32>) -> Self {
        match limit {
            Some(limit) => TimerMode::CountDown { limit },
            None => TimerMode::CountUp,
        }
    }

    const fn initial_value(self) -> u32 {
        match self {
            TimerMode::CountUp => 0,
            TimerMode::CountDown { limit } => limit,
        }
    }
}

/// What a tick fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// New clock reading.
    Tick(u32),
    /// Count-down reached zero. Fired once.
    Expired,
}

pub type TimerEvents = SmallVec<[TimerEvent; 2]>;

/// A clock counting up or down once per tick.
///
/// ```
/// use memory_match::timer::{CountdownTimer, TimerEvent, TimerMode};
///
/// let mut timer = CountdownTimer::new(TimerMode::CountDown { limit: 2 });
/// timer.start();
///
/// assert_eq!(timer.tick().as_slice(), &[TimerEvent::Tick(1)]);
/// assert_eq!(timer.tick().as_slice(), &[TimerEvent::Tick(0), TimerEvent::Expired]);
/// assert!(!timer.is_running());
/// assert!(timer.tick().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CountdownTimer {
    mode: TimerMode,
    value: u32,
    running: bool,
    expired: bool,
}

impl CountdownTimer {
    /// Create a stopped timer.
    #[must_use]
    pub fn new(mode: TimerMode) -> Self {
        Self {
            mode,
            value: mode.initial_value(),
            running: false,
            expired: false,
        }
    }

    /// Counting direction.
    #[must_use]
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Current reading.
    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Has a count-down reached zero?
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Begin ticking. Returns `false` (and does nothing) if already running
    /// or expired.
    pub fn start(&mut self) -> bool {
        if self.running || self.expired {
            return false;
        }
        self.running = true;
        true
    }

    /// Halt ticking. Idempotent; returns whether it was running.
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Stop and rewind to the initial reading.
    pub fn reset(&mut self) {
        self.running = false;
        self.expired = false;
        self.value = self.mode.initial_value();
    }

    /// Advance one second. Empty when stopped.
    pub fn tick(&mut self) -> TimerEvents {
        let mut events = TimerEvents::new();
        if !self.running {
            return events;
        }

        match self.mode {
            TimerMode::CountUp => {
                self.value = self.value.saturating_add(1);
                events.push(TimerEvent::Tick(self.value));
            }
            TimerMode::CountDown { .. } => {
                self.value = self.value.saturating_sub(1);
                events.push(TimerEvent::Tick(self.value));
                if self.value == 0 {
                    self.expired = true;
                    self.running = false;
                    events.push(TimerEvent::Expired);
                }
            }
        }
        events
    }
}

/// Format seconds as `MM:SS`.
///
/// ```
/// assert_eq!(memory_match::timer::format_clock(75), "01:15");
/// ```
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
