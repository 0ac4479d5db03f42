//! Python bindings for deck loading and spread building.
//!
//! # Quick Start
//!
//! ```python
//! import tarot_spread as tarot
//!
//! deck = tarot.CardDeck.standard()
//! builder = tarot.SpreadBuilder(deck, seed=42)
//!
//! spread = builder.build("three-card", question="What lies ahead?")
//! for card in spread.cards:
//!     print(card.position, card.card.title, card.reversed)
//! ```

use pyo3::prelude::*;

mod py_cards;
mod py_spreads;

pub use py_cards::*;
pub use py_spreads::*;

/// tarot_spread: tarot decks, spread layouts and seeded draws.
#[pymodule]
fn tarot_spread(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Deck
    m.add_class::<PyCardRecord>()?;
    m.add_class::<PyCardDeck>()?;

    // Spreads
    m.add_class::<PySpreadLayout>()?;
    m.add_class::<PySpreadCatalog>()?;
    m.add_class::<PyPositionedCard>()?;
    m.add_class::<PyResolvedSpread>()?;
    m.add_class::<PySpreadBuilder>()?;

    Ok(())
}
