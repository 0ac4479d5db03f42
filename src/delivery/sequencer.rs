//! Staged delivery of a resolved spread.
//!
//! The sequencer walks the `DeliveryState` machine, emitting the actions of
//! each state and pausing before the next. It runs as one cooperative task
//! per request and stops at the first suspension point after its
//! cancellation token fires or a text send fails.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::sink::{Controls, MessageId, NotificationSink, TransportError};
use super::split::split_blocks;
use super::state::DeliveryState;
use crate::core::{DeliveryMode, EngineConfig};
use crate::spreads::{PositionedCard, ResolvedSpread};

/// Outcome of one delivery run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    /// Last state entered. `Done` when the run completed.
    pub last_state: DeliveryState,

    pub completed: bool,

    /// Messages sent plus edits made.
    pub actions_emitted: usize,

    /// Cards (1-based) whose image failed and were sent as text.
    pub fallback_cards: Vec<usize>,
}

impl DeliveryReport {
    fn new() -> Self {
        Self {
            last_state: DeliveryState::Announcing,
            completed: false,
            actions_emitted: 0,
            fallback_cards: Vec::new(),
        }
    }
}

/// Why a run stopped early.
enum Halt {
    Cancelled,
    Transport(TransportError),
}

impl From<TransportError> for Halt {
    fn from(err: TransportError) -> Self {
        Halt::Transport(err)
    }
}

/// Drives one spread through the delivery states.
pub struct DeliverySequencer {
    sink: Arc<dyn NotificationSink>,
    announce_delay: Duration,
    reveal_delay: Duration,
    message_limit: usize,
    mode: DeliveryMode,
    cancel: CancellationToken,
}

impl DeliverySequencer {
    pub fn new(sink: Arc<dyn NotificationSink>, config: &EngineConfig) -> Self {
        Self {
            sink,
            announce_delay: config.announce_delay(),
            reveal_delay: config.reveal_delay(),
            message_limit: config.message_limit,
            mode: config.delivery_mode,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop when `cancel` fires (the chat or session ended).
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Deliver `spread`, returning how far the run got.
    ///
    /// Never fails: image problems fall back to text, and a dead session
    /// just ends the run. Nothing already sent is retracted.
    pub async fn run(&self, spread: &ResolvedSpread) -> DeliveryReport {
        let mut report = DeliveryReport::new();
        let mut announcement = None;
        let mut state = DeliveryState::Announcing;

        loop {
            if self.cancel.is_cancelled() {
                info!(layout = %spread.layout_id, %state, "Delivery cancelled");
                break;
            }
            report.last_state = state;
            if state.is_terminal() {
                report.completed = true;
                break;
            }

            debug!(layout = %spread.layout_id, %state, "Entering delivery state");
            let step = self.enter(state, spread, &mut announcement, &mut report).await;
            let step = match step {
                Ok(()) => self.pause(self.delay_after(state)).await,
                Err(halt) => Err(halt),
            };

            match step {
                Ok(()) => state = state.next(spread.len(), self.mode),
                Err(Halt::Cancelled) => {
                    info!(layout = %spread.layout_id, %state, "Delivery cancelled");
                    break;
                }
                Err(Halt::Transport(err)) => {
                    warn!(
                        layout = %spread.layout_id,
                        %state,
                        error = %err,
                        "Transport failed, abandoning delivery"
                    );
                    break;
                }
            }
        }

        report
    }

    async fn enter(
        &self,
        state: DeliveryState,
        spread: &ResolvedSpread,
        announcement: &mut Option<MessageId>,
        report: &mut DeliveryReport,
    ) -> Result<(), Halt> {
        match state {
            DeliveryState::Announcing => {
                let text = format!("🔮 {} Beginning the *{}* spread...", spread.emoji, spread.name);
                *announcement = Some(self.sink.send_text(&text, None).await?);
                report.actions_emitted += 1;
            }
            DeliveryState::Shuffling => {
                let statuses = shuffling_statuses(spread.len());
                for (i, status) in statuses.iter().enumerate() {
                    if i > 0 {
                        self.pause(self.announce_delay).await?;
                    }
                    match announcement {
                        Some(id) => self.sink.edit_text(*id, status).await?,
                        None => {
                            *announcement = Some(self.sink.send_text(status, None).await?);
                        }
                    }
                    report.actions_emitted += 1;
                }
            }
            DeliveryState::RevealingCard(k) => {
                self.reveal(k, &spread.cards()[k - 1], report).await?;
            }
            DeliveryState::Summarizing => {
                let blocks = match self.mode {
                    DeliveryMode::Staged => summary_blocks(spread),
                    DeliveryMode::Compact => spread.text_blocks(),
                };
                let trailing = Controls::after_spread(spread);
                let parts = split_blocks(&blocks, self.message_limit);
                let last = parts.len().saturating_sub(1);
                for (i, part) in parts.iter().enumerate() {
                    let controls = (i == last).then_some(&trailing);
                    self.sink.send_text(part, controls).await?;
                    report.actions_emitted += 1;
                }
            }
            DeliveryState::Done => {}
        }
        Ok(())
    }

    /// Position label, then the card as image + caption or as text.
    async fn reveal(
        &self,
        number: usize,
        card: &PositionedCard,
        report: &mut DeliveryReport,
    ) -> Result<(), Halt> {
        let label = format!("🎴 *{}. {}*", number, card.position);
        self.sink.send_text(&label, None).await?;
        report.actions_emitted += 1;

        if let Some(image) = &card.image {
            match self.sink.send_image(image, &card.interpretation).await {
                Ok(_) => {
                    report.actions_emitted += 1;
                    return Ok(());
                }
                Err(err) => {
                    warn!(card = number, image = %image, error = %err, "Image send failed, falling back to text");
                    report.fallback_cards.push(number);
                }
            }
        }

        self.sink.send_text(&card.interpretation, None).await?;
        report.actions_emitted += 1;
        Ok(())
    }

    fn delay_after(&self, state: DeliveryState) -> Duration {
        match state {
            DeliveryState::RevealingCard(_) => self.reveal_delay,
            DeliveryState::Done => Duration::ZERO,
            _ => self.announce_delay,
        }
    }

    /// Sleep for `delay`, waking early if the run is cancelled.
    async fn pause(&self, delay: Duration) -> Result<(), Halt> {
        if !delay.is_zero() {
            tokio::select! {
                _ = self.cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {}
            }
        }
        if self.cancel.is_cancelled() {
            Err(Halt::Cancelled)
        } else {
            Ok(())
        }
    }
}

fn shuffling_statuses(card_count: usize) -> [String; 3] {
    let noun = if card_count == 1 { "card" } else { "cards" };
    [
        "🃏 Shuffling the cards...".to_string(),
        "✨ The cards are ready to reveal their secrets...".to_string(),
        format!("🎯 Laying out {card_count} {noun}..."),
    ]
}

fn summary_blocks(spread: &ResolvedSpread) -> Vec<String> {
    let mut head = format!("✨ *The \"{}\" spread is complete!*\n\n", spread.name);
    if !spread.description.is_empty() {
        head.push_str(&format!("_{}_\n\n", spread.description));
    }
    vec![
        head,
        "🔮 All cards are revealed and ready to offer their advice.\n\n".to_string(),
        "_Remember: tarot is a tool for reflection and self-discovery. Use it wisely!_".to_string(),
    ]
}
