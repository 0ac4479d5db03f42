//! The notification sink: what delivery needs from a chat transport.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cards::ImageRef;
use crate::error::SpreadError;
use crate::spreads::ResolvedSpread;

/// Transport-assigned id of a sent message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub i64);

/// One interactive button under a message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub label: String,
    /// Opaque payload the transport returns when the button is pressed.
    pub action: String,
}

impl Control {
    pub fn new(label: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: action.into(),
        }
    }
}

/// Buttons attached to a message, one per row.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Controls(pub Vec<Control>);

impl Controls {
    /// Follow-up actions offered once a spread is delivered.
    ///
    /// The interpretation payload carries the layout id and the draw state,
    /// `interpret:<layout>:<seed>:<word_pos>`, so the spread can be rebuilt.
    pub fn after_spread(spread: &ResolvedSpread) -> Self {
        let draw = &spread.draw_state;
        Self(vec![
            Control::new("🔄 New spread", "new_spread"),
            Control::new(
                "🤖 Interpretation",
                format!("interpret:{}:{}:{}", spread.layout_id, draw.seed, draw.word_pos),
            ),
            Control::new("❓ Help", "help"),
        ])
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Failures reported by a transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The chat or session no longer exists.
    #[error("chat session is gone")]
    SessionGone,

    #[error("image unavailable: {0}")]
    ImageUnavailable(String),

    #[error("message rejected: {0}")]
    Rejected(String),
}

impl From<TransportError> for SpreadError {
    fn from(err: TransportError) -> Self {
        SpreadError::TransportFailure(err.to_string())
    }
}

/// Outbound side of a chat transport.
///
/// Implementations own throttling and timeouts; each call either succeeds,
/// fails fast, or times out under the transport's own policy.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Send a text message, optionally with buttons.
    async fn send_text(
        &self,
        text: &str,
        controls: Option<&Controls>,
    ) -> Result<MessageId, TransportError>;

    /// Replace the text of a message sent earlier.
    async fn edit_text(&self, message: MessageId, text: &str) -> Result<(), TransportError>;

    /// Send an image with a caption.
    async fn send_image(&self, image: &ImageRef, caption: &str)
        -> Result<MessageId, TransportError>;
}
