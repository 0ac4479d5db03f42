//! Error types for spread generation and delivery.
//!
//! Per-request failures (`SpreadError`) are kept apart from startup failures
//! (`DeckError`): a deck that fails to load must stop the process, while a bad
//! request only produces a rejection message for that chat.

use thiserror::Error;

/// Main error type for per-request operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpreadError {
    /// Requested card count cannot be satisfied by the deck.
    #[error("Cannot draw {requested} cards from a deck of {available}")]
    InvalidArgument { requested: usize, available: usize },

    /// Configuration values are inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown layout, card index or card name.
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Optional collaborator is not configured.
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    /// Optional collaborator failed upstream.
    #[error("Service error: {0}")]
    ServiceError(String),

    /// The chat session went away mid-sequence.
    #[error("Transport failure: {0}")]
    TransportFailure(String),
}

impl SpreadError {
    /// Shorthand for an unknown layout id.
    pub fn layout_not_found(id: impl Into<String>) -> Self {
        SpreadError::NotFound {
            resource: "Spread layout",
            id: id.into(),
        }
    }

    /// Shorthand for a card index or name that does not exist.
    pub fn card_not_found(id: impl Into<String>) -> Self {
        SpreadError::NotFound {
            resource: "Card",
            id: id.into(),
        }
    }

    /// Returns true if the error should be shown to the user as a rejection.
    ///
    /// Degraded collaborators and dead sessions are not rejections: the former
    /// get a "not available" notice, the latter have nobody left to notify.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            SpreadError::InvalidArgument { .. } | SpreadError::NotFound { .. }
        )
    }
}

/// Convenience Result type for spread operations.
pub type Result<T> = std::result::Result<T, SpreadError>;

/// Errors raised while loading the card data source at startup.
#[derive(Error, Debug)]
pub enum DeckError {
    #[error("Failed to read card data: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed card data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Malformed deck snapshot: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error("Card data source contains no cards")]
    Empty,

    #[error("Duplicate card name in data source: {0}")]
    DuplicateName(String),
}
