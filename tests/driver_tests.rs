//! Real-time driver tests.
//!
//! Every test runs on a paused tokio clock, so the one-second tick and the
//! mismatch delay elapse instantly but in order.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::time::sleep;
use url::Url;

use memory_match::cards::{CardFace, Deck};
use memory_match::catalog::{CatalogError, CatalogProvider, StaticCatalog};
use memory_match::core::{CardId, Difficulty, PokemonId, SessionSettings};
use memory_match::runtime::{Command, SessionDriver};
use memory_match::session::{Outcome, RecordingRenderer, RenderEvent, SessionController};

const CATALOG_SIZE: u32 = 151;

/// The deck the first start of a session with these settings deals.
fn first_deck(settings: &SessionSettings) -> Deck {
    let mut controller = SessionController::new(settings.clone());
    controller.set_catalog_max_id(CATALOG_SIZE);
    controller.start().expect("probe session should start");
    controller.deck().clone()
}

/// First card, its partner, and a card from another pair.
fn pair_and_stranger(deck: &Deck) -> (CardId, CardId, CardId) {
    let first = deck.at(0).unwrap();
    let partner = deck
        .iter()
        .find(|c| c.id != first.id && c.pair_key == first.pair_key)
        .unwrap();
    let stranger = deck.iter().find(|c| c.pair_key != first.pair_key).unwrap();
    (first.id, partner.id, stranger.id)
}

fn driver(settings: SessionSettings) -> SessionDriver<StaticCatalog, RecordingRenderer> {
    let controller = SessionController::with_renderer(settings, RecordingRenderer::new());
    SessionDriver::new(controller, StaticCatalog::with_max_id(CATALOG_SIZE))
}

// =============================================================================
// Mismatch delay
// =============================================================================

/// Test that a mismatch turns back after one second and blocks input until then.
#[tokio::test(start_paused = true)]
async fn test_mismatch_turns_back_after_delay() {
    let settings = SessionSettings::new().with_seed(11);
    let (a, b, c) = pair_and_stranger(&first_deck(&settings));
    let mut driver = driver(settings);
    let (tx, rx) = mpsc::channel(16);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        tx.send(Command::Select(a)).await.unwrap();
        tx.send(Command::Select(c)).await.unwrap();

        // Still inside the visible window: ignored.
        sleep(Duration::from_millis(500)).await;
        tx.send(Command::Select(b)).await.unwrap();

        sleep(Duration::from_millis(1000)).await;
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    assert_eq!(controller.counters().clicks, 2);
    assert_eq!(controller.counters().pairs_matched, 0);
    assert!(controller.state().selection.is_empty());
    for card in [a, b, c] {
        assert_eq!(controller.deck().get(card).unwrap().face, CardFace::FaceDown);
    }
    assert_eq!(controller.state().clock, 89);

    let events = controller.renderer().events();
    assert!(events.contains(&RenderEvent::CardFlipped {
        card: a,
        face: CardFace::FaceDown
    }));
    assert!(!events.contains(&RenderEvent::CardFlipped {
        card: b,
        face: CardFace::FaceUp
    }));
}

/// Test that a reset during the visible window cancels the pending flip-back.
#[tokio::test(start_paused = true)]
async fn test_reset_cancels_pending_mismatch() {
    let settings = SessionSettings::new().with_seed(12);
    let (a, _, c) = pair_and_stranger(&first_deck(&settings));
    let mut driver = driver(settings);
    let (tx, rx) = mpsc::channel(16);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        tx.send(Command::Select(a)).await.unwrap();
        tx.send(Command::Select(c)).await.unwrap();
        sleep(Duration::from_millis(300)).await;
        tx.send(Command::Reset).await.unwrap();
        sleep(Duration::from_secs(3)).await;
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    assert!(controller.deck().is_empty());
    assert!(controller.pending_mismatch().is_none());
    assert!(!controller.timer().is_running());

    let events = controller.renderer().events();
    let last_reset = events
        .iter()
        .rposition(|e| *e == RenderEvent::SessionReset)
        .unwrap();
    assert!(events[last_reset..]
        .iter()
        .all(|e| !matches!(e, RenderEvent::CardFlipped { .. } | RenderEvent::TimeChanged(89))));
}

// =============================================================================
// Clock
// =============================================================================

/// Test that a hard session is lost once sixty seconds pass.
#[tokio::test(start_paused = true)]
async fn test_hard_session_times_out() {
    let settings = SessionSettings::new()
        .with_seed(13)
        .with_difficulty(Difficulty::Hard);
    let mut driver = driver(settings);
    let (tx, rx) = mpsc::channel(16);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(61_500)).await;
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    assert_eq!(controller.deck().len(), 20);
    assert_eq!(controller.outcome(), Outcome::Lost);
    assert_eq!(controller.state().clock, 0);
    assert!(!controller.timer().is_running());
    assert_eq!(controller.renderer().last_outcome(), Some(Outcome::Lost));

    let ticks: Vec<u32> = controller
        .renderer()
        .events()
        .iter()
        .skip_while(|e| !matches!(e, RenderEvent::DeckBuilt { .. }))
        .filter_map(|e| match e {
            RenderEvent::TimeChanged(t) => Some(*t),
            _ => None,
        })
        .collect();
    let expected: Vec<u32> = (0..=60).rev().collect();
    assert_eq!(ticks, expected);
}

/// Test that winning stops the clock for good.
#[tokio::test(start_paused = true)]
async fn test_win_freezes_clock() {
    let settings = SessionSettings::new().with_seed(14);
    let deck = first_deck(&settings);
    let mut driver = driver(settings);
    let (tx, rx) = mpsc::channel(32);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(2500)).await;
        for key in deck.pair_keys() {
            for card in deck.iter().filter(|c| c.pair_key == key) {
                tx.send(Command::Select(card.id)).await.unwrap();
            }
        }
        sleep(Duration::from_secs(10)).await;
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    assert_eq!(controller.outcome(), Outcome::Won);
    assert_eq!(controller.counters().clicks, 8);
    assert_eq!(controller.counters().pairs_left, 0);
    assert_eq!(controller.state().clock, 88);
    assert!(!controller.timer().is_running());
}

// =============================================================================
// Catalog and commands
// =============================================================================

/// Test that start waits for the catalog and retries once it is back.
#[tokio::test(start_paused = true)]
async fn test_start_retries_catalog() {
    let catalog = Arc::new(StaticCatalog::with_max_id(CATALOG_SIZE));
    catalog.set_offline(true);

    let controller = SessionController::with_renderer(
        SessionSettings::new().with_seed(15),
        RecordingRenderer::new(),
    );
    let mut driver = SessionDriver::new(controller, Arc::clone(&catalog));
    let (tx, rx) = mpsc::channel(16);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(10)).await;

        catalog.set_offline(false);
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(10)).await;
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    assert_eq!(controller.catalog_max_id(), Some(CATALOG_SIZE));
    assert_eq!(controller.deck().len(), 8);

    let events = controller.renderer().events();
    let dealt = events
        .iter()
        .filter(|e| matches!(e, RenderEvent::DeckBuilt { .. }))
        .count();
    assert_eq!(dealt, 1);

    let images: Vec<&RenderEvent> = events
        .iter()
        .filter(|e| matches!(e, RenderEvent::ImageResolved { .. }))
        .collect();
    assert_eq!(images.len(), 4);
    for event in images {
        let RenderEvent::ImageResolved { pair_key, url } = event else {
            unreachable!();
        };
        assert_eq!(url, &format!("memory://images/{}.png", pair_key.raw()));
    }
}

/// Test that difficulty changes are refused mid-session and applied after reset.
#[tokio::test(start_paused = true)]
async fn test_difficulty_commands() {
    let mut driver = driver(SessionSettings::new().with_seed(16));
    let (tx, rx) = mpsc::channel(16);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        tx.send(Command::ChangeDifficulty(Difficulty::Hard)).await.unwrap();
        tx.send(Command::SetTheme("dark".to_string())).await.unwrap();
        sleep(Duration::from_millis(1500)).await;
        tx.send(Command::Reset).await.unwrap();
        tx.send(Command::ChangeDifficulty(Difficulty::Medium)).await.unwrap();
        tx.send(Command::Start).await.unwrap();
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    assert_eq!(controller.config().difficulty, Difficulty::Medium);
    assert_eq!(controller.deck().len(), 12);
    assert_eq!(controller.state().clock, 75);
    assert_eq!(controller.theme(), "dark");
}

/// Test that dropping every sender ends the run.
#[tokio::test(start_paused = true)]
async fn test_channel_close_stops_driver() {
    let mut driver = driver(SessionSettings::new().with_seed(17));
    let (tx, rx) = mpsc::channel(4);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(3500)).await;
        drop(tx);
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    assert!(controller.is_running());
    assert_eq!(controller.state().clock, 87);
}

// =============================================================================
// Slow image lookups
// =============================================================================

/// Catalog whose image lookups each take `delay`.
struct SlowCatalog {
    inner: StaticCatalog,
    delay: Duration,
}

impl SlowCatalog {
    fn new(delay: Duration) -> Self {
        Self {
            inner: StaticCatalog::with_max_id(CATALOG_SIZE),
            delay,
        }
    }
}

#[async_trait]
impl CatalogProvider for SlowCatalog {
    async fn fetch_max_id(&self) -> Result<u32, CatalogError> {
        self.inner.fetch_max_id().await
    }

    async fn fetch_image_url(&self, id: PokemonId) -> Result<Url, CatalogError> {
        sleep(self.delay).await;
        self.inner.fetch_image_url(id).await
    }
}

/// Clock, image and reset notifications after the deck was dealt, as short labels.
fn timeline(events: &[RenderEvent]) -> Vec<String> {
    events
        .iter()
        .skip_while(|e| !matches!(e, RenderEvent::DeckBuilt { .. }))
        .filter_map(|e| match e {
            RenderEvent::TimeChanged(t) => Some(format!("T{t}")),
            RenderEvent::ImageResolved { .. } => Some("I".to_string()),
            RenderEvent::SessionReset => Some("R".to_string()),
            _ => None,
        })
        .collect()
}

/// Test that ticks and commands keep flowing while images load.
#[tokio::test(start_paused = true)]
async fn test_clock_runs_during_image_lookups() {
    let settings = SessionSettings::new().with_seed(18);
    let (a, _, _) = pair_and_stranger(&first_deck(&settings));
    let controller = SessionController::with_renderer(settings, RecordingRenderer::new());
    let mut driver = SessionDriver::new(controller, SlowCatalog::new(Duration::from_millis(1500)));
    let (tx, rx) = mpsc::channel(16);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(500)).await;
        tx.send(Command::Select(a)).await.unwrap();
        sleep(Duration::from_millis(2000)).await;
        tx.send(Command::Reset).await.unwrap();
        sleep(Duration::from_millis(100)).await;
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    // Ticks at 1 s and 2 s, all four lookups at 1.5 s, reset at 2.5 s.
    assert_eq!(
        timeline(controller.renderer().events()),
        vec!["T90", "T89", "I", "I", "I", "I", "T88", "R", "T90"]
    );
    assert!(controller.renderer().events().contains(&RenderEvent::CardFlipped {
        card: a,
        face: CardFace::FaceUp
    }));
}

/// Test that lookups still running at reset never reach the renderer.
#[tokio::test(start_paused = true)]
async fn test_reset_drops_pending_image_lookups() {
    let controller = SessionController::with_renderer(
        SessionSettings::new().with_seed(19),
        RecordingRenderer::new(),
    );
    let mut driver = SessionDriver::new(controller, SlowCatalog::new(Duration::from_secs(5)));
    let (tx, rx) = mpsc::channel(16);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_millis(2500)).await;
        tx.send(Command::Reset).await.unwrap();
        sleep(Duration::from_secs(10)).await;
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    assert_eq!(
        timeline(controller.renderer().events()),
        vec!["T90", "T89", "T88", "R", "T90"]
    );
}

/// Test that a restart replaces the first deal's lookups with its own.
#[tokio::test(start_paused = true)]
async fn test_restart_resolves_only_new_images() {
    let controller = SessionController::with_renderer(
        SessionSettings::new().with_seed(20),
        RecordingRenderer::new(),
    );
    let mut driver = SessionDriver::new(controller, SlowCatalog::new(Duration::from_secs(2)));
    let (tx, rx) = mpsc::channel(16);

    let script = async move {
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_secs(1)).await;
        tx.send(Command::Start).await.unwrap();
        sleep(Duration::from_secs(5)).await;
        tx.send(Command::Shutdown).await.unwrap();
    };
    tokio::join!(driver.run(rx), script);

    let controller = driver.into_controller();
    let current: Vec<PokemonId> = controller.deck().pair_keys();
    let resolved: Vec<PokemonId> = controller
        .renderer()
        .events()
        .iter()
        .filter_map(|e| match e {
            RenderEvent::ImageResolved { pair_key, .. } => Some(*pair_key),
            _ => None,
        })
        .collect();

    assert_eq!(resolved.len(), 4);
    assert!(resolved.iter().all(|key| current.contains(key)));
}
