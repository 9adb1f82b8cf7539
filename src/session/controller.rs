//! Session controller: the single owner of a game session.
//!
//! `SessionController` owns configuration, state, deck, clock and renderer.
//! Every mutation goes through it, which serializes the turn engine and the
//! timer without any locking.
//!
//! ## Lifecycle
//!
//! 1. `load_catalog` (or `set_catalog_max_id`) resolves the catalog size
//! 2. `start` deals a deck and starts the clock
//! 3. `select` reveals cards; a mismatch returns a `PendingMismatch` the
//!    host must deliver back through `resolve_mismatch` after its delay
//! 4. `tick` once per second while the clock runs
//! 5. `reset` clears the table; `change_difficulty` is allowed whenever no
//!    session is running
//!
//! ```
//! use memory_match::core::SessionSettings;
//! use memory_match::session::SessionController;
//!
//! let mut controller = SessionController::new(SessionSettings::new().with_seed(1));
//! assert!(controller.start().is_err());
//!
//! controller.set_catalog_max_id(151);
//! controller.start().unwrap();
//! assert_eq!(controller.deck().len(), 8);
//! assert_eq!(controller.state().clock, 90);
//! ```

use std::time::Duration;

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};

use super::error::{Result, SessionError};
use super::renderer::{NullRenderer, Renderer};
use super::snapshot::SessionSnapshot;
use super::state::{Counters, Outcome, SessionState};
use crate::cards::{Deck, DeckBuilder, RandomCatalogSampler};
use crate::catalog::CatalogProvider;
use crate::core::{CardId, Difficulty, GameRng, PokemonId, SessionConfig, SessionSettings};
use crate::rules::{RejectReason, SelectStatus, TurnEngine, TurnEvent, TurnPhase};
use crate::timer::{CountdownTimer, TimerEvent, TimerEvents, TimerMode};

/// Identifies one scheduled mismatch resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MismatchToken(u64);

/// A mismatch waiting for its visible-delay window to pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingMismatch {
    pub token: MismatchToken,
    pub delay: Duration,
}

/// What a selection did, from the host's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Ignored; nothing changed.
    Rejected(RejectReason),
    /// First card of a turn turned face-up.
    Revealed,
    /// A pair was found and the session continues.
    Matched { pair_key: PokemonId },
    /// The last pair was found.
    Won,
    /// Two different cards are showing; resolve after `delay`.
    MismatchPending(PendingMismatch),
}

/// Owns and drives one game session at a time.
pub struct SessionController<R: Renderer = NullRenderer> {
    settings: SessionSettings,
    config: SessionConfig,
    state: SessionState,
    deck: Deck,
    builder: DeckBuilder,
    timer: CountdownTimer,
    rng: GameRng,
    renderer: R,
    catalog_max_id: Option<u32>,
    pending: Option<PendingMismatch>,
    next_token: u64,
    theme: String,
}

impl SessionController<NullRenderer> {
    /// Create a controller that renders nothing.
    #[must_use]
    pub fn new(settings: SessionSettings) -> Self {
        Self::with_renderer(settings, NullRenderer)
    }
}

impl<R: Renderer> SessionController<R> {
    /// Create a controller reporting to `renderer`.
    #[must_use]
    pub fn with_renderer(settings: SessionSettings, renderer: R) -> Self {
        let rng = settings.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let config = settings.session_config(settings.difficulty);
        let theme = settings.theme.clone();
        let timer = CountdownTimer::new(TimerMode::for_limit(config.time_limit_seconds));
        let mut state = SessionState::new(config.total_pairs);
        state.clock = timer.value();
        Self {
            config,
            state,
            deck: Deck::empty(),
            builder: DeckBuilder::new(),
            timer,
            rng,
            renderer,
            catalog_max_id: None,
            pending: None,
            next_token: 0,
            theme,
            settings,
        }
    }

    // === Accessors ===

    #[must_use]
    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn counters(&self) -> Counters {
        self.state.counters
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.state.outcome
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn timer(&self) -> &CountdownTimer {
        &self.timer
    }

    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        TurnEngine::phase_of(&self.state)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }

    #[must_use]
    pub fn catalog_max_id(&self) -> Option<u32> {
        self.catalog_max_id
    }

    /// The mismatch currently waiting to be resolved, if any.
    #[must_use]
    pub fn pending_mismatch(&self) -> Option<PendingMismatch> {
        self.pending
    }

    /// Is a dealt session still being played?
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.deck.is_empty() && self.state.outcome == Outcome::InProgress
    }

    /// Cheap read-only copy for redraws.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            config: self.config,
            counters: self.state.counters,
            clock: self.state.clock,
            outcome: self.state.outcome,
            phase: self.phase(),
            timer_running: self.timer.is_running(),
            theme: self.theme.clone(),
            deck: self.deck.clone(),
        }
    }

    // === Catalog ===

    /// Record the catalog size obtained elsewhere.
    pub fn set_catalog_max_id(&mut self, max_id: u32) {
        self.catalog_max_id = Some(max_id);
    }

    /// Ask the catalog for its size. On failure the previous value is kept
    /// and `start` stays refused until a load succeeds.
    pub async fn load_catalog<P>(&mut self, provider: &P) -> Result<u32>
    where
        P: CatalogProvider + ?Sized,
    {
        match provider.fetch_max_id().await {
            Ok(max_id) => {
                info!(max_id, "catalog ready");
                self.catalog_max_id = Some(max_id);
                Ok(max_id)
            }
            Err(err) => {
                warn!(error = %err, "catalog lookup failed");
                Err(err.into())
            }
        }
    }

    // === Configuration ===

    /// Switch difficulty and clear the table.
    ///
    /// Refused while a session is being played; allowed before the first
    /// start and after a win or loss.
    pub fn change_difficulty(&mut self, difficulty: Difficulty) -> Result<()> {
        if self.is_running() {
            return Err(SessionError::SessionRunning);
        }
        self.settings.difficulty = difficulty;
        self.config = self.settings.session_config(difficulty);
        info!(%difficulty, total_pairs = self.config.total_pairs, "difficulty changed");
        self.reset();
        Ok(())
    }

    /// Store the theme and pass it to the renderer. No effect on play.
    pub fn set_theme(&mut self, theme: impl Into<String>) {
        self.theme = theme.into();
        self.settings.theme = self.theme.clone();
        self.renderer.on_theme_changed(&self.theme);
    }

    // === Session lifecycle ===

    /// Deal a fresh deck and start the clock.
    ///
    /// Any session in progress is discarded first.
    pub fn start(&mut self) -> Result<()> {
        let max_id = self.catalog_max_id.ok_or(SessionError::CatalogNotReady)?;

        let mut session_rng = self.rng.fork();
        let pair_keys =
            RandomCatalogSampler::sample(self.config.total_pairs as usize, max_id, &mut session_rng)?;

        self.reset();
        debug_assert_eq!(
            pair_keys.iter().collect::<FxHashSet<_>>().len(),
            pair_keys.len(),
            "sampler returned a repeated pair key"
        );
        self.deck = self.builder.build(&pair_keys, &mut session_rng);
        debug_assert_eq!(self.deck.len(), self.config.card_count());
        debug_assert!(self.deck.is_well_formed());

        self.timer.start();
        self.state.clock = self.timer.value();

        self.renderer.on_deck_built(&self.deck);
        self.renderer.on_counters_changed(self.state.counters);
        self.renderer.on_time_changed(self.state.clock);

        info!(
            difficulty = %self.config.difficulty,
            total_pairs = self.config.total_pairs,
            time_limit = ?self.config.time_limit_seconds,
            "session started"
        );
        Ok(())
    }

    /// Clear the table. Safe from any state; cancels a pending mismatch.
    pub fn reset(&mut self) {
        let mode = TimerMode::for_limit(self.config.time_limit_seconds);
        if self.timer.mode() == mode {
            self.timer.reset();
        } else {
            self.timer = CountdownTimer::new(mode);
        }
        if let Some(pending) = self.pending.take() {
            debug!(token = ?pending.token, "pending mismatch cancelled");
        }
        self.deck = Deck::empty();
        self.state = SessionState::new(self.config.total_pairs);
        self.state.clock = self.timer.value();

        self.renderer.on_session_reset();
        self.renderer.on_counters_changed(self.state.counters);
        self.renderer.on_time_changed(self.state.clock);
    }

    // === Input ===

    /// Reveal a card.
    pub fn select(&mut self, card: CardId) -> SelectOutcome {
        let events = match TurnEngine::new(&mut self.state, &mut self.deck).select(card) {
            SelectStatus::Accepted(events) => events,
            SelectStatus::Rejected(reason) => return SelectOutcome::Rejected(reason),
        };

        let mut result = SelectOutcome::Revealed;
        for event in &events {
            match event {
                TurnEvent::CardFlipped { card, face } => self.renderer.on_card_flipped(*card, *face),
                TurnEvent::MatchFound {
                    first,
                    second,
                    pair_key,
                } => {
                    self.renderer.on_card_matched(*first);
                    self.renderer.on_card_matched(*second);
                    result = SelectOutcome::Matched { pair_key: *pair_key };
                }
                TurnEvent::MismatchPending { .. } => {
                    result = SelectOutcome::MismatchPending(self.schedule_mismatch());
                }
                TurnEvent::GameWon => result = SelectOutcome::Won,
            }
        }
        self.renderer.on_counters_changed(self.state.counters);

        if result == SelectOutcome::Won {
            self.finish(Outcome::Won);
        }
        result
    }

    fn schedule_mismatch(&mut self) -> PendingMismatch {
        self.next_token += 1;
        let pending = PendingMismatch {
            token: MismatchToken(self.next_token),
            delay: self.settings.mismatch_delay(),
        };
        self.pending = Some(pending);
        pending
    }

    /// Deliver a scheduled mismatch resolution.
    ///
    /// Returns `Ok(false)` for a token that was cancelled by `reset` or
    /// `start`; a stale callback never touches the new session.
    pub fn resolve_mismatch(&mut self, token: MismatchToken) -> Result<bool> {
        match self.pending {
            Some(pending) if pending.token == token => {}
            _ => {
                debug!(?token, "stale mismatch resolution ignored");
                return Ok(false);
            }
        }
        self.pending = None;

        let events = TurnEngine::new(&mut self.state, &mut self.deck).resolve_mismatch()?;
        for event in &events {
            if let TurnEvent::CardFlipped { card, face } = event {
                self.renderer.on_card_flipped(*card, *face);
            }
        }
        Ok(true)
    }

    /// Resolve whatever mismatch is pending, skipping the delay.
    pub fn resolve_pending(&mut self) -> Result<bool> {
        match self.pending {
            Some(pending) => self.resolve_mismatch(pending.token),
            None => Ok(false),
        }
    }

    // === Clock ===

    /// Advance the clock by one second. Does nothing while stopped.
    pub fn tick(&mut self) -> TimerEvents {
        let events = self.timer.tick();
        for event in &events {
            match event {
                TimerEvent::Tick(value) => {
                    self.state.clock = *value;
                    self.renderer.on_time_changed(*value);
                }
                TimerEvent::Expired => {
                    self.state.outcome = Outcome::Lost;
                    self.finish(Outcome::Lost);
                }
            }
        }
        events
    }

    fn finish(&mut self, outcome: Outcome) {
        self.timer.stop();
        info!(
            ?outcome,
            clicks = self.state.counters.clicks,
            pairs_matched = self.state.counters.pairs_matched,
            "session over"
        );
        self.renderer.on_outcome(outcome);
    }
}
