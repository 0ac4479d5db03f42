//! Resolved spreads - drawn cards bound to positions.
//!
//! A `ResolvedSpread` is produced per request and handed to delivery. It is
//! only ever created by `SpreadBuilder`, which zips cards and positions in
//! order, so position and card count always agree with the layout.

use crate::cards::ImageRef;
use crate::core::DrawRngState;
use crate::draw::DrawnCard;

/// One card bound to a position label.
#[derive(Clone, Debug)]
pub struct PositionedCard {
    pub position: String,
    pub card: DrawnCard,
    /// Rendered, truncated interpretation.
    pub interpretation: String,
    pub image: Option<ImageRef>,
}

impl PositionedCard {
    /// Canonical card name, for logs and prompts.
    #[must_use]
    pub fn card_name(&self) -> &str {
        &self.card.record.name
    }

    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.card.reversed
    }
}

/// A complete spread, ready for delivery.
#[derive(Clone, Debug)]
pub struct ResolvedSpread {
    pub layout_id: String,
    pub name: String,
    pub description: String,
    pub emoji: String,
    /// The question the user asked, if any.
    pub question: Option<String>,
    /// Random source state the cards were drawn from; replaying it with
    /// the same deck and layout draws the same cards.
    pub draw_state: DrawRngState,
    pub(crate) cards: Vec<PositionedCard>,
}

impl ResolvedSpread {
    /// Cards in position order.
    #[must_use]
    pub fn cards(&self) -> &[PositionedCard] {
        &self.cards
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Position labels in order.
    pub fn positions(&self) -> impl Iterator<Item = &str> {
        self.cards.iter().map(|c| c.position.as_str())
    }

    /// Opening block of the full-text rendering.
    #[must_use]
    pub fn header_block(&self) -> String {
        let mut header = format!("{} *{}*\n\n", self.emoji, self.name);
        if !self.description.is_empty() {
            header.push_str(&format!("_{}_\n\n", self.description));
        }
        if let Some(question) = &self.question {
            header.push_str(&format!("*Your question:* {question}\n\n"));
        }
        header
    }

    /// Text block for the card at `index` (0-based).
    ///
    /// A block is the unit the message splitter never breaks apart.
    #[must_use]
    pub fn card_block(&self, index: usize) -> String {
        let card = &self.cards[index];
        format!("*{}. {}*\n{}\n\n", index + 1, card.position, card.interpretation)
    }

    /// Header followed by every card block.
    #[must_use]
    pub fn text_blocks(&self) -> Vec<String> {
        std::iter::once(self.header_block())
            .chain((0..self.cards.len()).map(|i| self.card_block(i)))
            .collect()
    }

    /// The whole spread as one text.
    #[must_use]
    pub fn render_text(&self) -> String {
        self.text_blocks().concat()
    }
}
