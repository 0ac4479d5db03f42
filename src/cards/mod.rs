//! Card system: records, the deck and its data source.
//!
//! ## Key Types
//!
//! - `CardRecord`: Static card content (name, arcana, both meanings, artwork)
//! - `CardIndex`: Stable position of a record in its deck
//! - `CardDeck`: Immutable, shared table of records with cached statistics
//! - `DeckLoader`: Reads a deck from JSON or a binary snapshot

pub mod deck;
pub mod loader;
pub mod record;
mod standard;

pub use deck::{CardDeck, DeckStatistics};
pub use loader::DeckLoader;
pub use record::{Arcana, CardIndex, CardRecord, ImageRef};
