//! Spread layouts.

use serde::{Deserialize, Serialize};

/// Template for a spread: a named, ordered list of positions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpreadLayout {
    /// Stable identifier used in requests (`"three-card"`).
    pub id: String,

    /// Display name.
    pub name: String,

    pub description: String,

    /// Glyph shown when the spread is announced.
    pub emoji: String,

    /// Position labels; the spread size is their count.
    pub positions: Vec<String>,
}

impl SpreadLayout {
    #[must_use]
    pub fn new<I, S>(id: impl Into<String>, name: impl Into<String>, positions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            emoji: "🔮".to_string(),
            positions: positions.into_iter().map(Into::into).collect(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = emoji.into();
        self
    }

    /// Number of cards the layout needs.
    #[must_use]
    pub fn size(&self) -> usize {
        self.positions.len()
    }
}
