//! Delivery state machine.
//!
//! ```text
//! Announcing -> Shuffling -> RevealingCard(1..=N) -> Summarizing -> Done
//! ```
//!
//! Compact delivery goes straight from `Shuffling` to `Summarizing`.
//! Transitions only move forward.

use serde::{Deserialize, Serialize};

use crate::core::DeliveryMode;

/// Where a delivery run is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeliveryState {
    Announcing,
    Shuffling,
    /// Revealing card `k`, 1-based.
    RevealingCard(usize),
    Summarizing,
    Done,
}

impl DeliveryState {
    /// The state after this one for a spread of `card_count` cards.
    #[must_use]
    pub fn next(self, card_count: usize, mode: DeliveryMode) -> Self {
        match self {
            DeliveryState::Announcing => DeliveryState::Shuffling,
            DeliveryState::Shuffling => match mode {
                DeliveryMode::Staged if card_count > 0 => DeliveryState::RevealingCard(1),
                _ => DeliveryState::Summarizing,
            },
            DeliveryState::RevealingCard(k) if k < card_count => DeliveryState::RevealingCard(k + 1),
            DeliveryState::RevealingCard(_) => DeliveryState::Summarizing,
            DeliveryState::Summarizing | DeliveryState::Done => DeliveryState::Done,
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        self == DeliveryState::Done
    }
}

impl std::fmt::Display for DeliveryState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryState::Announcing => write!(f, "Announcing"),
            DeliveryState::Shuffling => write!(f, "Shuffling"),
            DeliveryState::RevealingCard(k) => write!(f, "RevealingCard({k})"),
            DeliveryState::Summarizing => write!(f, "Summarizing"),
            DeliveryState::Done => write!(f, "Done"),
        }
    }
}
