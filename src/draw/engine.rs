//! The draw engine.

use std::sync::Arc;

use tracing::debug;

use crate::cards::{CardDeck, CardRecord};
use crate::core::{DrawRng, DEFAULT_REVERSED_PROBABILITY};
use crate::error::{Result, SpreadError};

/// A card as it came out of the deck.
#[derive(Clone, Debug)]
pub struct DrawnCard {
    pub record: Arc<CardRecord>,
    pub reversed: bool,
}

impl DrawnCard {
    /// Meaning text for this card's orientation.
    #[must_use]
    pub fn meaning(&self) -> &str {
        self.record.meaning(self.reversed)
    }
}

/// Samples distinct cards from a shared deck.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use tarot_spread::cards::CardDeck;
/// use tarot_spread::core::DrawRng;
/// use tarot_spread::draw::DrawEngine;
///
/// let engine = DrawEngine::new(Arc::new(CardDeck::standard()), 0.3);
/// let mut rng = DrawRng::new(42);
///
/// let cards = engine.draw(&mut rng, 3).unwrap();
/// assert_eq!(cards.len(), 3);
/// assert!(engine.draw(&mut rng, 79).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct DrawEngine {
    deck: Arc<CardDeck>,
    reversed_probability: f64,
}

impl DrawEngine {
    /// Create an engine over `deck`.
    ///
    /// `reversed_probability` is clamped into `[0, 1]`; NaN falls back to
    /// `DEFAULT_REVERSED_PROBABILITY`.
    pub fn new(deck: Arc<CardDeck>, reversed_probability: f64) -> Self {
        let reversed_probability = if reversed_probability.is_nan() {
            DEFAULT_REVERSED_PROBABILITY
        } else {
            reversed_probability.clamp(0.0, 1.0)
        };
        Self {
            deck,
            reversed_probability,
        }
    }

    #[must_use]
    pub fn deck(&self) -> &Arc<CardDeck> {
        &self.deck
    }

    #[must_use]
    pub fn reversed_probability(&self) -> f64 {
        self.reversed_probability
    }

    /// Draw `count` distinct cards in draw order.
    ///
    /// Fails with `InvalidArgument` unless `0 < count <= deck.size()`.
    /// Selection and orientation consume the same stream but each
    /// orientation is an independent Bernoulli trial.
    pub fn draw(&self, rng: &mut DrawRng, count: usize) -> Result<Vec<DrawnCard>> {
        let available = self.deck.size();
        if count == 0 || count > available {
            return Err(SpreadError::InvalidArgument {
                requested: count,
                available,
            });
        }

        let indices = rng.sample_indices(available, count);
        let mut drawn = Vec::with_capacity(count);
        for index in indices {
            let record = self
                .deck
                .shared(index)
                .ok_or_else(|| SpreadError::card_not_found(index.to_string()))?;
            let reversed = rng.gen_bool(self.reversed_probability);
            drawn.push(DrawnCard { record, reversed });
        }

        debug!(count, deck_size = available, "Drew cards");
        Ok(drawn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Arcana;
    use rustc_hash::FxHashSet;

    fn deck_of(size: usize) -> Arc<CardDeck> {
        let records = (0..size)
            .map(|i| {
                CardRecord::new(format!("Card_{i}"), Arcana::Minor)
                    .with_meanings(format!("up {i}"), format!("down {i}"))
            })
            .collect();
        Arc::new(CardDeck::from_records(records).unwrap())
    }

    #[test]
    fn test_draw_exact_count_distinct() {
        let engine = DrawEngine::new(deck_of(10), 0.3);
        let mut rng = DrawRng::new(1);

        for count in 1..=10 {
            let cards = engine.draw(&mut rng, count).unwrap();
            assert_eq!(cards.len(), count);
            let unique: FxHashSet<_> = cards.iter().map(|c| c.record.index).collect();
            assert_eq!(unique.len(), count);
        }
    }

    #[test]
    fn test_draw_zero_rejected() {
        let engine = DrawEngine::new(deck_of(5), 0.3);
        let err = engine.draw(&mut DrawRng::new(1), 0).unwrap_err();
        assert_eq!(err, SpreadError::InvalidArgument { requested: 0, available: 5 });
    }

    #[test]
    fn test_draw_more_than_deck_rejected() {
        let engine = DrawEngine::new(deck_of(5), 0.3);
        let err = engine.draw(&mut DrawRng::new(1), 6).unwrap_err();
        assert_eq!(err, SpreadError::InvalidArgument { requested: 6, available: 5 });
    }

    #[test]
    fn test_seeded_draws_repeat() {
        let engine = DrawEngine::new(deck_of(78), 0.3);
        let a = engine.draw(&mut DrawRng::new(99), 10).unwrap();
        let b = engine.draw(&mut DrawRng::new(99), 10).unwrap();

        let key = |cards: &[DrawnCard]| -> Vec<_> {
            cards.iter().map(|c| (c.record.index, c.reversed)).collect()
        };
        assert_eq!(key(&a), key(&b));
    }

    #[test]
    fn test_probability_extremes() {
        let always = DrawEngine::new(deck_of(20), 1.0);
        let never = DrawEngine::new(deck_of(20), 0.0);
        let mut rng = DrawRng::new(5);

        assert!(always.draw(&mut rng, 20).unwrap().iter().all(|c| c.reversed));
        assert!(never.draw(&mut rng, 20).unwrap().iter().all(|c| !c.reversed));
    }

    #[test]
    fn test_unusable_probability_is_sanitized() {
        let nan = DrawEngine::new(deck_of(20), f64::NAN);
        assert_eq!(nan.reversed_probability(), DEFAULT_REVERSED_PROBABILITY);
        assert_eq!(nan.draw(&mut DrawRng::new(3), 20).unwrap().len(), 20);

        assert_eq!(DrawEngine::new(deck_of(1), 7.5).reversed_probability(), 1.0);
        assert_eq!(DrawEngine::new(deck_of(1), -0.5).reversed_probability(), 0.0);
    }

    #[test]
    fn test_meaning_follows_orientation() {
        let engine = DrawEngine::new(deck_of(1), 1.0);
        let card = &engine.draw(&mut DrawRng::new(0), 1).unwrap()[0];
        assert_eq!(card.meaning(), "down 0");
    }
}
