//! Terminal front end: plays a session from stdin commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use url::Url;

use memory_match::catalog::{CatalogProvider, PokeApiCatalog, StaticCatalog};
use memory_match::timer::format_clock;
use memory_match::{
    CardFace, CardId, Command, Counters, Deck, Difficulty, Outcome, PokemonId, Renderer,
    SessionController, SessionDriver, SessionSettings,
};

/// Number of entries in the built-in offline catalog.
const OFFLINE_CATALOG_SIZE: u32 = 151;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file (TOML).
    #[arg(long)]
    config: Option<PathBuf>,

    /// easy, medium or hard.
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// Fixed seed for a reproducible deck.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    theme: Option<String>,

    /// Count up with no time limit.
    #[arg(long)]
    untimed: bool,

    /// Use a built-in catalog instead of PokeAPI.
    #[arg(long)]
    offline: bool,
}

/// Prints notifications as plain lines.
struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn on_deck_built(&mut self, deck: &Deck) {
        let ids: Vec<String> = deck.iter().map(|card| format!("[{:>3}]", card.id.raw())).collect();
        for row in ids.chunks(4) {
            println!("{}", row.join(" "));
        }
    }

    fn on_card_flipped(&mut self, card: CardId, face: CardFace) {
        println!("{card}: {face:?}");
    }

    fn on_card_matched(&mut self, card: CardId) {
        println!("{card}: matched");
    }

    fn on_counters_changed(&mut self, counters: Counters) {
        println!(
            "Clicks: {} | Pairs Left: {} | Pairs Matched: {}",
            counters.clicks, counters.pairs_left, counters.pairs_matched
        );
    }

    fn on_time_changed(&mut self, seconds: u32) {
        if seconds % 10 == 0 {
            println!("Time: {}", format_clock(seconds));
        }
    }

    fn on_outcome(&mut self, outcome: Outcome) {
        println!("{}", outcome.message());
    }

    fn on_session_reset(&mut self) {
        println!("Table cleared.");
    }

    fn on_image_resolved(&mut self, pair_key: PokemonId, url: &Url) {
        println!("{pair_key}: {url}");
    }

    fn on_theme_changed(&mut self, theme: &str) {
        println!("Theme: {theme}");
    }
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = words.next()?;
    let arg = words.next();
    match (head, arg) {
        ("start", None) => Some(Command::Start),
        ("reset", None) => Some(Command::Reset),
        ("quit" | "exit", None) => Some(Command::Shutdown),
        ("flip", Some(id)) => id.parse().ok().map(|id| Command::Select(CardId::new(id))),
        ("difficulty", Some(level)) => level.parse().ok().map(Command::ChangeDifficulty),
        ("theme", Some(theme)) => Some(Command::SetTheme(theme.to_string())),
        (id, None) => id.parse().ok().map(|id| Command::Select(CardId::new(id))),
        _ => None,
    }
}

fn settings_from(cli: &Cli) -> Result<SessionSettings> {
    let mut settings = match &cli.config {
        Some(path) => SessionSettings::load(path)?,
        None => SessionSettings::new(),
    };
    if let Some(difficulty) = cli.difficulty {
        settings = settings.with_difficulty(difficulty);
    }
    if let Some(seed) = cli.seed {
        settings = settings.with_seed(seed);
    }
    if let Some(theme) = &cli.theme {
        settings = settings.with_theme(theme.clone());
    }
    if cli.untimed {
        settings = settings.with_timed(false);
    }
    Ok(settings)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings = settings_from(&cli)?;

    let catalog: Arc<dyn CatalogProvider> = if cli.offline {
        Arc::new(StaticCatalog::with_max_id(OFFLINE_CATALOG_SIZE))
    } else {
        Arc::new(PokeApiCatalog::new(settings.catalog_base_url.clone())?)
    };

    println!("Commands: start | reset | flip <id> | difficulty <level> | theme <name> | quit");

    let (tx, rx) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(command) => {
                    if tx.send(command).await.is_err() {
                        break;
                    }
                }
                None => eprintln!("unrecognized command: {line}"),
            }
        }
    });

    let controller = SessionController::with_renderer(settings, TerminalRenderer);
    let mut driver = SessionDriver::new(controller, catalog);
    driver.run(rx).await;
    Ok(())
}
