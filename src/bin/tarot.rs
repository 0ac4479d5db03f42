//! Console front-end: draws spreads and prints the delivery sequence.

use std::path::PathBuf;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tarot_spread::{
    CardDeck, Controls, DeckLoader, DeliveryMode, EngineConfig, ImageRef, MessageId,
    NotificationSink, Reader, SpreadCatalog, SpreadRequest, TransportError,
};

#[derive(Parser)]
#[command(name = "tarot", about = "Draw tarot spreads in the terminal", version)]
struct Cli {
    /// Card data file (JSON or .bin snapshot); built-in deck when omitted
    #[arg(short, long, global = true)]
    deck: Option<PathBuf>,

    /// Engine configuration as JSON
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Fixed seed for reproducible draws
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw a spread and deliver it to the terminal
    Draw {
        /// Layout id (see `tarot list`)
        #[arg(default_value = "three-card")]
        layout: String,

        /// Question to record with the spread
        #[arg(short, long)]
        question: Option<String>,

        /// Send the whole spread as text instead of revealing card by card
        #[arg(long)]
        compact: bool,

        /// Skip pacing delays
        #[arg(long)]
        no_delay: bool,

        /// Ask for narrative commentary after delivery
        #[arg(long)]
        enrich: bool,
    },

    /// List available layouts
    List,

    /// Suggest layouts for a question
    Recommend {
        question: String,
    },

    /// Show deck statistics
    Stats,

    /// Write the deck as a binary snapshot
    Snapshot {
        output: PathBuf,
    },
}

/// Sink that prints each action to stdout.
#[derive(Default)]
struct ConsoleSink {
    next_id: AtomicI64,
}

impl ConsoleSink {
    fn allocate_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn send_text(
        &self,
        text: &str,
        controls: Option<&Controls>,
    ) -> Result<MessageId, TransportError> {
        println!("{text}");
        if let Some(controls) = controls {
            for control in &controls.0 {
                println!("  [{}]", control.label);
            }
        }
        println!();
        Ok(self.allocate_id())
    }

    async fn edit_text(&self, _message: MessageId, text: &str) -> Result<(), TransportError> {
        println!("{text}");
        Ok(())
    }

    async fn send_image(
        &self,
        image: &ImageRef,
        caption: &str,
    ) -> Result<MessageId, TransportError> {
        if !std::path::Path::new(image.as_str()).exists() {
            return Err(TransportError::ImageUnavailable(image.to_string()));
        }
        println!("[image: {image}]\n{caption}\n");
        Ok(self.allocate_id())
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            EngineConfig::from_json(&json)?
        }
        None => EngineConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    Ok(config)
}

fn load_deck(path: Option<&PathBuf>) -> anyhow::Result<CardDeck> {
    match path {
        Some(path) => DeckLoader::new()
            .derive_image_names(true)
            .load_path(path)
            .with_context(|| format!("loading deck {}", path.display())),
        None => Ok(CardDeck::standard()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = load_config(&cli)?;
    let deck = Arc::new(load_deck(cli.deck.as_ref())?);
    let catalog = Arc::new(SpreadCatalog::builtin());

    match cli.command {
        Commands::Draw {
            layout,
            question,
            compact,
            no_delay,
            enrich,
        } => {
            if compact {
                config = config.with_delivery_mode(DeliveryMode::Compact);
            }
            if no_delay {
                config = config.with_delays(Duration::ZERO, Duration::ZERO);
            }
            let reader = Reader::new(deck, catalog, config)?;

            let mut request = SpreadRequest::new(layout).with_enrichment(enrich);
            if let Some(question) = question {
                request = request.with_question(question);
            }

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    warn!("Interrupted, stopping delivery");
                    on_interrupt.cancel();
                }
            });

            let report = reader.handle(&request, Arc::new(ConsoleSink::default()), cancel).await?;
            info!(
                completed = report.completed,
                actions = report.actions_emitted,
                fallbacks = report.fallback_cards.len(),
                "Delivery finished"
            );
        }
        Commands::List => {
            for layout in catalog.iter() {
                println!("{:<12} {:>2} cards  {} {}", layout.id, layout.size(), layout.emoji, layout.name);
            }
        }
        Commands::Recommend { question } => {
            for layout in catalog.recommend(&question) {
                println!("{} {} ({})", layout.emoji, layout.name, layout.id);
            }
        }
        Commands::Stats => {
            let reader = Reader::new(deck, catalog, config)?;
            println!("{}", reader.statistics_message());
        }
        Commands::Snapshot { output } => {
            let bytes = deck.to_snapshot()?;
            std::fs::write(&output, bytes)
                .with_context(|| format!("writing snapshot {}", output.display()))?;
            println!("Wrote {} cards to {}", deck.size(), output.display());
        }
    }

    Ok(())
}
