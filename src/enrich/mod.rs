//! Optional narrative commentary on a delivered spread.
//!
//! An enricher turns a spread into free-form prose, usually by calling a
//! language model. It is strictly optional: every failure, and a slow
//! answer, degrades to a short "not available" notice.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::SpreadError;
use crate::spreads::ResolvedSpread;

/// Heading placed above successful commentary.
pub const ENRICHMENT_HEADING: &str = "🤖 *AI interpretation of the spread*";

/// Footer placed below successful commentary.
pub const ENRICHMENT_DISCLAIMER: &str =
    "_Remember: AI commentary complements, but does not replace, the traditional card meanings._";

/// Shown when no commentary could be produced.
pub const ENRICHMENT_UNAVAILABLE: &str = "❌ AI interpretation is not available right now.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnrichError {
    /// No enrichment service is configured.
    #[error("enrichment unavailable: {0}")]
    Unavailable(String),

    /// The service answered with an error.
    #[error("enrichment service error: {0}")]
    ServiceError(String),
}

impl From<EnrichError> for SpreadError {
    fn from(err: EnrichError) -> Self {
        match err {
            EnrichError::Unavailable(msg) => SpreadError::Unavailable(msg),
            EnrichError::ServiceError(msg) => SpreadError::ServiceError(msg),
        }
    }
}

/// Produces narrative commentary for a spread.
#[async_trait]
pub trait NarrativeEnricher: Send + Sync {
    async fn interpret(
        &self,
        spread: &ResolvedSpread,
        question: Option<&str>,
    ) -> Result<String, EnrichError>;
}

/// Enricher used when no service is configured.
#[derive(Clone, Copy, Debug, Default)]
pub struct DisabledEnricher;

#[async_trait]
impl NarrativeEnricher for DisabledEnricher {
    async fn interpret(
        &self,
        _spread: &ResolvedSpread,
        _question: Option<&str>,
    ) -> Result<String, EnrichError> {
        Err(EnrichError::Unavailable("no enrichment service configured".to_string()))
    }
}

/// Render the request text an enrichment service receives.
///
/// ```
/// use std::sync::Arc;
/// use tarot_spread::cards::CardDeck;
/// use tarot_spread::core::{DrawRng, EngineConfig};
/// use tarot_spread::enrich::build_prompt;
/// use tarot_spread::spreads::{SpreadBuilder, SpreadCatalog};
///
/// let builder = SpreadBuilder::new(
///     Arc::new(CardDeck::standard()),
///     Arc::new(SpreadCatalog::builtin()),
///     &EngineConfig::default(),
/// );
/// let spread = builder.build(&mut DrawRng::new(3), "three-card").unwrap();
///
/// let prompt = build_prompt(&spread, Some("What lies ahead?"));
/// assert!(prompt.contains("1. Past: "));
/// assert!(prompt.contains("What lies ahead?"));
/// ```
pub fn build_prompt(spread: &ResolvedSpread, question: Option<&str>) -> String {
    let mut prompt = String::from(
        "You are an experienced tarot reader. Analyse this tarot spread and give a deep, intuitive interpretation.\n\n",
    );
    prompt.push_str(&format!("Spread: {}\n", spread.name));
    if !spread.description.is_empty() {
        prompt.push_str(&format!("Description: {}\n", spread.description));
    }
    prompt.push_str("\nCards in the spread:\n");

    for (i, card) in spread.cards().iter().enumerate() {
        let orientation = if card.is_reversed() { "reversed" } else { "upright" };
        prompt.push_str(&format!(
            "{}. {}: {} ({orientation})\n",
            i + 1,
            card.position,
            card.card.record.display_title(),
        ));
    }

    if let Some(question) = question.filter(|q| !q.trim().is_empty()) {
        prompt.push_str(&format!("\nThe user's question: {question}\n"));
    }

    prompt.push_str(
        "\nGive a coherent reading of the whole spread, covering how the cards relate, \
         the overall energy of the spread, advice, and possible ways events may unfold.\n",
    );
    prompt
}

/// Ask `enricher` for commentary, bounded by `timeout`.
///
/// Always yields text to send: the commentary wrapped with a heading and a
/// disclaimer, or the "not available" notice.
pub async fn enrich_or_notice(
    enricher: &dyn NarrativeEnricher,
    spread: &ResolvedSpread,
    question: Option<&str>,
    timeout: Duration,
) -> String {
    let outcome = match tokio::time::timeout(timeout, enricher.interpret(spread, question)).await {
        Ok(outcome) => outcome,
        Err(_) => Err(EnrichError::ServiceError(format!(
            "no answer within {} ms",
            timeout.as_millis()
        ))),
    };

    match outcome {
        Ok(prose) => {
            info!(layout = %spread.layout_id, chars = prose.chars().count(), "Enrichment received");
            format!("{ENRICHMENT_HEADING}\n\n{}\n\n{ENRICHMENT_DISCLAIMER}", prose.trim())
        }
        Err(EnrichError::Unavailable(reason)) => {
            info!(layout = %spread.layout_id, %reason, "Enrichment unavailable");
            ENRICHMENT_UNAVAILABLE.to_string()
        }
        Err(err) => {
            warn!(layout = %spread.layout_id, error = %err, "Enrichment failed");
            ENRICHMENT_UNAVAILABLE.to_string()
        }
    }
}
