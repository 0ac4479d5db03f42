//! Core engine types: RNG and configuration.
//!
//! Everything here is independent of card content and of the transport.

pub mod config;
pub mod rng;

pub use config::{
    DeliveryMode, EngineConfig, DEFAULT_REVERSED_PROBABILITY, POSITION_LABEL_BUDGET,
    TRUNCATION_MARKER,
};
pub use rng::{DrawRng, DrawRngState, IndexBuf};
