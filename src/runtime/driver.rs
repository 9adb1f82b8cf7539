//! Real-time session driver.
//!
//! Runs a `SessionController` on the current task: one clock tick per
//! second, the mismatch delay as a cancellable deadline, image lookups for
//! the dealt deck, and player commands in arrival order. Nothing is
//! spawned, so the renderer does not need to be `Send`.
//!
//! Image lookups are polled alongside the clock and the command channel.
//! A slow catalog never holds back a tick or a command, and lookups for a
//! table that was reset or re-dealt are dropped unfinished.

use std::time::Duration;

use futures::future::{FutureExt, LocalBoxFuture};
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};
use url::Url;

use crate::catalog::{CatalogError, CatalogProvider};
use crate::core::{CardId, Difficulty, PokemonId};
use crate::session::{MismatchToken, Renderer, SelectOutcome, SessionController};

const TICK: Duration = Duration::from_secs(1);

/// Player and host input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Select(CardId),
    Start,
    Reset,
    ChangeDifficulty(Difficulty),
    SetTheme(String),
    Shutdown,
}

/// Drives a controller against a catalog in real time.
pub struct SessionDriver<P, R: Renderer> {
    catalog: P,
    host: Host<R>,
}

/// Controller plus its two deadlines.
struct Host<R: Renderer> {
    controller: SessionController<R>,
    next_tick: Option<Instant>,
    mismatch_due: Option<(Instant, MismatchToken)>,
}

type ImageLookup<'a> = LocalBoxFuture<'a, (PokemonId, Result<Url, CatalogError>)>;

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

impl<P: CatalogProvider, R: Renderer> SessionDriver<P, R> {
    #[must_use]
    pub fn new(controller: SessionController<R>, catalog: P) -> Self {
        Self {
            catalog,
            host: Host {
                controller,
                next_tick: None,
                mismatch_due: None,
            },
        }
    }

    #[must_use]
    pub fn controller(&self) -> &SessionController<R> {
        &self.host.controller
    }

    #[must_use]
    pub fn into_controller(self) -> SessionController<R> {
        self.host.controller
    }

    /// Run until `Shutdown` or until every sender is dropped.
    ///
    /// The catalog is queried once up front; if that fails, each `Start`
    /// retries it.
    pub async fn run(&mut self, mut commands: mpsc::Receiver<Command>) {
        let catalog = &self.catalog;
        let host = &mut self.host;
        let mut images: FuturesUnordered<ImageLookup<'_>> = FuturesUnordered::new();

        // Failure is already logged; Start will retry.
        let _ = host.controller.load_catalog(catalog).await;

        loop {
            tokio::select! {
                biased;

                () = sleep_until_opt(host.mismatch_due.map(|(at, _)| at)) => {
                    host.fire_mismatch();
                }
                () = sleep_until_opt(host.next_tick) => {
                    host.fire_tick();
                }
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("command channel closed");
                        break;
                    };
                    match command {
                        Command::Shutdown => {
                            info!("driver shutting down");
                            break;
                        }
                        Command::Start => {
                            if host.start(catalog).await {
                                images.clear();
                                for pair_key in host.controller.deck().pair_keys() {
                                    images.push(lookup(catalog, pair_key));
                                }
                            }
                        }
                        command => {
                            if host.apply(command) {
                                images.clear();
                            }
                        }
                    }
                }
                Some((pair_key, result)) = images.next(), if !images.is_empty() => {
                    host.image_resolved(pair_key, result);
                }
            }
        }
    }
}

fn lookup<P: CatalogProvider>(catalog: &P, pair_key: PokemonId) -> ImageLookup<'_> {
    async move { (pair_key, catalog.fetch_image_url(pair_key).await) }.boxed_local()
}

impl<R: Renderer> Host<R> {
    fn fire_mismatch(&mut self) {
        let Some((_, token)) = self.mismatch_due.take() else {
            return;
        };
        if let Err(err) = self.controller.resolve_mismatch(token) {
            warn!(error = %err, "mismatch resolution failed");
        }
    }

    fn fire_tick(&mut self) {
        self.controller.tick();
        self.next_tick = match self.next_tick {
            Some(at) if self.controller.timer().is_running() => Some(at + TICK),
            _ => None,
        };
    }

    /// Apply a command that needs no catalog access. Returns whether the
    /// table was cleared.
    fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::Select(card) => {
                match self.controller.select(card) {
                    SelectOutcome::MismatchPending(pending) => {
                        self.mismatch_due = Some((Instant::now() + pending.delay, pending.token));
                    }
                    SelectOutcome::Rejected(reason) => debug!(%card, ?reason, "selection ignored"),
                    _ => {}
                }
                if !self.controller.timer().is_running() {
                    self.next_tick = None;
                }
                false
            }
            Command::Reset => {
                self.controller.reset();
                self.clear_schedule();
                true
            }
            Command::ChangeDifficulty(difficulty) => match self.controller.change_difficulty(difficulty) {
                Ok(()) => {
                    self.clear_schedule();
                    true
                }
                Err(err) => {
                    warn!(error = %err, "difficulty change refused");
                    false
                }
            },
            Command::SetTheme(theme) => {
                self.controller.set_theme(theme);
                false
            }
            Command::Start | Command::Shutdown => false,
        }
    }

    /// Deal a new table and start the clock. Returns whether a session
    /// started.
    async fn start<P: CatalogProvider + ?Sized>(&mut self, catalog: &P) -> bool {
        if self.controller.catalog_max_id().is_none()
            && self.controller.load_catalog(catalog).await.is_err()
        {
            return false;
        }

        if let Err(err) = self.controller.start() {
            warn!(error = %err, "session start refused");
            return false;
        }
        self.mismatch_due = None;
        self.next_tick = Some(Instant::now() + TICK);
        true
    }

    fn image_resolved(&mut self, pair_key: PokemonId, result: Result<Url, CatalogError>) {
        match result {
            Ok(url) => self.controller.renderer_mut().on_image_resolved(pair_key, &url),
            Err(err) => warn!(%pair_key, error = %err, "image lookup failed"),
        }
    }

    fn clear_schedule(&mut self) {
        self.next_tick = None;
        self.mismatch_due = None;
    }
}
