//! Spread assembly.

use std::sync::Arc;

use tracing::debug;

use super::catalog::SpreadCatalog;
use super::resolved::{PositionedCard, ResolvedSpread};
use crate::cards::{CardDeck, CardRecord, ImageRef};
use crate::core::{DrawRng, EngineConfig, TRUNCATION_MARKER};
use crate::draw::DrawEngine;
use crate::error::Result;

/// Render the interpretation text for one card.
///
/// The result is cut to `max_chars` characters, plus `...` when cut.
pub fn render_interpretation(record: &CardRecord, reversed: bool, max_chars: usize) -> String {
    let title = record.display_title();
    let mut text = if reversed {
        format!("🔄 *{title}* (reversed)\n\n")
    } else {
        format!("🔮 *{title}*\n\n")
    };
    text.push_str(record.meaning(reversed));
    if !record.keywords.is_empty() {
        text.push_str(&format!("\n\n_Keywords: {}_", record.keywords.join(", ")));
    }
    truncate_chars(text, max_chars)
}

fn truncate_chars(mut text: String, max_chars: usize) -> String {
    if let Some((cut, _)) = text.char_indices().nth(max_chars) {
        text.truncate(cut);
        text.push_str(TRUNCATION_MARKER);
    }
    text
}

/// Builds resolved spreads from the catalog and the draw engine.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use tarot_spread::cards::CardDeck;
/// use tarot_spread::core::{DrawRng, EngineConfig};
/// use tarot_spread::spreads::{SpreadBuilder, SpreadCatalog};
///
/// let builder = SpreadBuilder::new(
///     Arc::new(CardDeck::standard()),
///     Arc::new(SpreadCatalog::builtin()),
///     &EngineConfig::default(),
/// );
///
/// let spread = builder.build(&mut DrawRng::new(42), "three-card").unwrap();
/// let positions: Vec<_> = spread.positions().collect();
/// assert_eq!(positions, vec!["Past", "Present", "Future"]);
/// ```
#[derive(Clone, Debug)]
pub struct SpreadBuilder {
    catalog: Arc<SpreadCatalog>,
    engine: DrawEngine,
    interpretation_max_chars: usize,
    image_dir: String,
}

impl SpreadBuilder {
    pub fn new(deck: Arc<CardDeck>, catalog: Arc<SpreadCatalog>, config: &EngineConfig) -> Self {
        Self {
            catalog,
            engine: DrawEngine::new(deck, config.reversed_probability),
            interpretation_max_chars: config.interpretation_max_chars,
            image_dir: config.image_dir.clone(),
        }
    }

    #[must_use]
    pub fn catalog(&self) -> &SpreadCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn deck(&self) -> &CardDeck {
        self.engine.deck()
    }

    /// Build a spread for `layout_id`.
    pub fn build(&self, rng: &mut DrawRng, layout_id: &str) -> Result<ResolvedSpread> {
        self.build_for(rng, layout_id, None)
    }

    /// Build a spread for `layout_id`, recording the user's question.
    ///
    /// The i-th drawn card is bound to the i-th position. The question is cut
    /// like an interpretation so the header stays within a message.
    pub fn build_for(
        &self,
        rng: &mut DrawRng,
        layout_id: &str,
        question: Option<&str>,
    ) -> Result<ResolvedSpread> {
        let layout = self.catalog.get(layout_id)?;
        let draw_state = rng.state();
        let drawn = self.engine.draw(rng, layout.size())?;

        let cards = layout
            .positions
            .iter()
            .zip(drawn)
            .map(|(position, card)| {
                let interpretation =
                    render_interpretation(&card.record, card.reversed, self.interpretation_max_chars);
                let image = card
                    .record
                    .image
                    .as_deref()
                    .map(|file| ImageRef::resolve(&self.image_dir, file));
                PositionedCard {
                    position: position.clone(),
                    card,
                    interpretation,
                    image,
                }
            })
            .collect();

        debug!(layout = layout_id, cards = layout.size(), "Built spread");

        Ok(ResolvedSpread {
            layout_id: layout.id.clone(),
            name: layout.name.clone(),
            description: layout.description.clone(),
            emoji: layout.emoji.clone(),
            question: question
                .map(|q| truncate_chars(q.to_string(), self.interpretation_max_chars)),
            draw_state,
            cards,
        })
    }
}
