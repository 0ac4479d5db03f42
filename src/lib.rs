//! # tarot-spread
//!
//! Tarot spread generation and paced delivery for chat front-ends.
//!
//! ## Design Principles
//!
//! 1. **Injected Randomness**: Every draw takes a `DrawRng`. Seeded sources
//!    make draws reproducible; the process-wide source is seeded from entropy.
//!
//! 2. **Explicit Delivery States**: A spread is delivered by walking
//!    `Announcing -> Shuffling -> RevealingCard(k) -> Summarizing -> Done`,
//!    with pacing delays between states and cancellation checked at each step.
//!
//! 3. **Transport at the Edge**: Delivery talks to a `NotificationSink`.
//!    Chat bots, the console binary and tests provide their own.
//!
//! ## Modules
//!
//! - `core`: Random source and engine configuration
//! - `cards`: Card records, the deck and its loader
//! - `draw`: Distinct-card draws with independent reversals
//! - `spreads`: Layouts, the catalog and spread assembly
//! - `delivery`: Sink trait, message splitting and the delivery sequencer
//! - `enrich`: Optional narrative commentary
//! - `reader`: Request-level entry point tying it all together
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use tarot_spread::{CardDeck, DrawRng, EngineConfig, SpreadBuilder, SpreadCatalog};
//!
//! let builder = SpreadBuilder::new(
//!     Arc::new(CardDeck::standard()),
//!     Arc::new(SpreadCatalog::builtin()),
//!     &EngineConfig::default(),
//! );
//!
//! let spread = builder.build(&mut DrawRng::new(7), "ten-card").unwrap();
//! assert_eq!(spread.len(), 10);
//! ```

pub mod cards;
pub mod core;
pub mod delivery;
pub mod draw;
pub mod enrich;
pub mod error;
pub mod reader;
pub mod spreads;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{DeliveryMode, DrawRng, DrawRngState, EngineConfig};

pub use crate::cards::{Arcana, CardDeck, CardIndex, CardRecord, DeckLoader, DeckStatistics, ImageRef};

pub use crate::draw::{DrawEngine, DrawnCard};

pub use crate::spreads::{
    render_interpretation, PositionedCard, ResolvedSpread, SpreadBuilder, SpreadCatalog,
    SpreadLayout,
};

pub use crate::delivery::{
    split_blocks, Control, Controls, DeliveryReport, DeliverySequencer, DeliveryState, MessageId,
    NotificationSink, RecordingSink, SinkEvent, TransportError,
};

pub use crate::enrich::{build_prompt, DisabledEnricher, EnrichError, NarrativeEnricher};

pub use crate::reader::{Reader, ReaderAction, SpreadRequest};

pub use crate::error::{DeckError, Result, SpreadError};
