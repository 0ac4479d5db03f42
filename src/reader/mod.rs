//! Request-level entry point.
//!
//! A `Reader` owns the shared, read-only state (deck, catalog, master random
//! source) and serves spread requests end to end: build, deliver, then
//! optionally enrich. Requests run concurrently; each one forks its own
//! random stream from the master so draws never contend on a lock for long.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::cards::CardDeck;
use crate::core::{DrawRng, DrawRngState, EngineConfig};
use crate::delivery::{Control, Controls, DeliveryReport, DeliverySequencer, NotificationSink};
use crate::enrich::{enrich_or_notice, DisabledEnricher, NarrativeEnricher};
use crate::error::{Result, SpreadError};
use crate::spreads::{ResolvedSpread, SpreadBuilder, SpreadCatalog};

/// One user request for a spread.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadRequest {
    pub layout_id: String,
    pub question: Option<String>,
    /// Follow the spread with narrative commentary.
    pub enrich: bool,
}

impl SpreadRequest {
    pub fn new(layout_id: impl Into<String>) -> Self {
        Self {
            layout_id: layout_id.into(),
            ..Self::default()
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = Some(question.into());
        self
    }

    pub fn with_enrichment(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }
}

/// A control payload, parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReaderAction {
    /// Show the layout menu.
    NewSpread,
    /// Draw the named layout.
    Spread(String),
    /// Commentary for a delivered spread, rebuilt from its draw state.
    Interpret { layout_id: String, draw: DrawRngState },
    Help,
}

impl ReaderAction {
    /// Parse an action payload produced by `Controls`.
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "new_spread" => Some(ReaderAction::NewSpread),
            "help" => Some(ReaderAction::Help),
            _ => {
                if let Some(id) = payload.strip_prefix("spread:") {
                    Some(ReaderAction::Spread(id.to_string()))
                } else {
                    payload.strip_prefix("interpret:").and_then(Self::parse_interpret)
                }
            }
        }
    }

    /// `<layout>:<seed>:<word_pos>`; layout ids never contain ':'.
    fn parse_interpret(rest: &str) -> Option<Self> {
        let mut parts = rest.rsplitn(3, ':');
        let word_pos = parts.next()?.parse::<u128>().ok()?;
        let seed = parts.next()?.parse::<u64>().ok()?;
        let layout_id = parts.next().filter(|id| !id.is_empty())?;
        Some(ReaderAction::Interpret {
            layout_id: layout_id.to_string(),
            draw: DrawRngState {
                seed,
                word_pos,
                fork_counter: 0,
            },
        })
    }
}

/// Serves spread requests against a shared deck and catalog.
pub struct Reader {
    builder: SpreadBuilder,
    master_rng: Mutex<DrawRng>,
    config: EngineConfig,
    enricher: Arc<dyn NarrativeEnricher>,
}

impl Reader {
    /// Create a reader; fails if `config` does not validate.
    pub fn new(deck: Arc<CardDeck>, catalog: Arc<SpreadCatalog>, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let stats = deck.statistics();
        info!(
            cards = stats.total,
            major = stats.major,
            minor = stats.minor,
            layouts = catalog.len(),
            seeded = config.seed.is_some(),
            "Reader ready"
        );
        Ok(Self {
            builder: SpreadBuilder::new(deck, catalog, &config),
            master_rng: Mutex::new(DrawRng::from_seed_or_entropy(config.seed)),
            config,
            enricher: Arc::new(DisabledEnricher),
        })
    }

    /// Use `enricher` for commentary requests.
    pub fn with_enricher(mut self, enricher: Arc<dyn NarrativeEnricher>) -> Self {
        self.enricher = enricher;
        self
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &SpreadCatalog {
        self.builder.catalog()
    }

    #[must_use]
    pub fn deck(&self) -> &CardDeck {
        self.builder.deck()
    }

    /// Build a spread on a random stream forked from the master source.
    pub fn draw_spread(&self, layout_id: &str, question: Option<&str>) -> Result<ResolvedSpread> {
        let mut rng = self.master_rng.lock().fork();
        self.builder.build_for(&mut rng, layout_id, question)
    }

    /// Serve one request on `sink`.
    ///
    /// Unknown layouts and impossible draws are answered with a rejection
    /// message and returned as errors. Once delivery has started the
    /// request succeeds, even if delivery stopped early; the report says
    /// how far it got.
    pub async fn handle(
        &self,
        request: &SpreadRequest,
        sink: Arc<dyn NotificationSink>,
        cancel: CancellationToken,
    ) -> Result<DeliveryReport> {
        let spread = match self.draw_spread(&request.layout_id, request.question.as_deref()) {
            Ok(spread) => spread,
            Err(err) => return Err(self.reject(&request.layout_id, err, sink.as_ref()).await),
        };

        info!(layout = %spread.layout_id, cards = spread.len(), "Delivering spread");
        let report = DeliverySequencer::new(sink.clone(), &self.config)
            .with_cancellation(cancel.clone())
            .run(&spread)
            .await;

        if report.completed && request.enrich && !cancel.is_cancelled() {
            let text = enrich_or_notice(
                self.enricher.as_ref(),
                &spread,
                request.question.as_deref(),
                self.config.enrich_timeout(),
            )
            .await;
            if let Err(err) = sink.send_text(&text, None).await {
                warn!(layout = %spread.layout_id, error = %err, "Could not deliver enrichment");
            }
        }

        Ok(report)
    }

    /// Serve a button press.
    ///
    /// Only `Spread` delivers a reading, so only it yields a report.
    /// `Interpret` redraws the spread from the state carried in its payload
    /// and sends commentary for it, without delivering the cards again.
    pub async fn handle_action(
        &self,
        action: &ReaderAction,
        sink: Arc<dyn NotificationSink>,
        cancel: CancellationToken,
    ) -> Result<Option<DeliveryReport>> {
        match action {
            ReaderAction::NewSpread => {
                sink.send_text(&self.menu_message(), Some(&self.menu_controls())).await?;
                Ok(None)
            }
            ReaderAction::Spread(layout_id) => {
                let request = SpreadRequest::new(layout_id.as_str());
                self.handle(&request, sink, cancel).await.map(Some)
            }
            ReaderAction::Help => {
                sink.send_text(&self.help_message(), Some(&self.menu_controls())).await?;
                Ok(None)
            }
            ReaderAction::Interpret { layout_id, draw } => {
                let mut rng = DrawRng::from_state(draw);
                let spread = match self.builder.build(&mut rng, layout_id) {
                    Ok(spread) => spread,
                    Err(err) => return Err(self.reject(layout_id, err, sink.as_ref()).await),
                };
                if cancel.is_cancelled() {
                    return Ok(None);
                }
                info!(layout = %spread.layout_id, seed = draw.seed, "Interpreting replayed spread");
                let text = enrich_or_notice(
                    self.enricher.as_ref(),
                    &spread,
                    None,
                    self.config.enrich_timeout(),
                )
                .await;
                sink.send_text(&text, None).await?;
                Ok(None)
            }
        }
    }

    /// Tell the user why a request failed, when it is their doing.
    async fn reject(
        &self,
        layout_id: &str,
        err: SpreadError,
        sink: &dyn NotificationSink,
    ) -> SpreadError {
        if err.is_user_facing() {
            info!(layout = %layout_id, error = %err, "Rejecting spread request");
            let text = format!("❌ {err}");
            if let Err(send_err) = sink.send_text(&text, Some(&self.menu_controls())).await {
                warn!(error = %send_err, "Could not deliver rejection");
            }
        }
        err
    }

    /// One button per layout, in catalog order.
    #[must_use]
    pub fn menu_controls(&self) -> Controls {
        Controls(
            self.catalog()
                .iter()
                .map(|layout| {
                    let noun = if layout.size() == 1 { "card" } else { "cards" };
                    Control::new(
                        format!("{} {} ({} {noun})", layout.emoji, layout.name, layout.size()),
                        format!("spread:{}", layout.id),
                    )
                })
                .collect(),
        )
    }

    /// Menu text listing the layouts and what they are for.
    #[must_use]
    pub fn menu_message(&self) -> String {
        let mut text = String::from("🔮 *Choose a spread:*\n\n");
        for layout in self.catalog().iter() {
            text.push_str(&format!("{} *{}*", layout.emoji, layout.name));
            if !layout.description.is_empty() {
                text.push_str(&format!(" - {}", layout.description));
            }
            text.push('\n');
        }
        text
    }

    /// Usage notes and the list of layouts.
    #[must_use]
    pub fn help_message(&self) -> String {
        let mut text = String::from("🔮 *Tarot reader help*\n\n*Available spreads:*\n");
        for layout in self.catalog().iter() {
            let noun = if layout.size() == 1 { "card" } else { "cards" };
            let line = format!("{} {} ({} {noun})\n", layout.emoji, layout.name, layout.size());
            text.push_str(&line);
        }
        text.push_str(
            "\n*How to use:*\n\
             1. Choose a spread from the menu\n\
             2. Receive your reading card by card\n\n\
             *Notes:*\n\
             • Cards may come out reversed, which changes their meaning\n\
             • Every spread is drawn fresh\n\
             • Use the cards for reflection, not prediction\n\n\
             May the cards show you the right path! ✨",
        );
        text
    }

    /// Deck and catalog summary.
    #[must_use]
    pub fn statistics_message(&self) -> String {
        let stats = self.deck().statistics();
        format!(
            "📊 *Deck statistics*\n\n🃏 Cards: {}\n⭐ Major arcana: {}\n🔸 Minor arcana: {}\n🔮 Spreads available: {}",
            stats.total,
            stats.major,
            stats.minor,
            self.catalog().len()
        )
    }
}
