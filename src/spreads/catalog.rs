//! Spread catalog: the registry of available layouts.
//!
//! The catalog keeps registration order, which is the order front-ends list
//! layouts in their menus.

use rustc_hash::FxHashMap;

use super::layout::SpreadLayout;
use crate::core::{DrawRng, POSITION_LABEL_BUDGET};
use crate::error::{Result, SpreadError};

/// Question keywords that point to a particular layout.
const TOPICS: [(&str, &[&str]); 5] = [
    ("love", &["love", "relationship", "partner"]),
    ("decision", &["decision", "choice", "choose", "what should"]),
    ("three-card", &["future", "what awaits"]),
    ("year-ahead", &["year", "month"]),
    ("chakra", &["energy", "chakra"]),
];

/// Longest position label, in characters, for a layout of `position_count`.
///
/// A card block frames its label as `*NN. label*\n` and ends with `\n\n`;
/// label and framing together must stay within `POSITION_LABEL_BUDGET`.
#[must_use]
pub fn max_position_label_chars(position_count: usize) -> usize {
    let digits = position_count.max(1).to_string().len();
    POSITION_LABEL_BUDGET.saturating_sub(digits + 7)
}

/// Layouts suggested when a question matches no topic.
const DEFAULT_RECOMMENDATIONS: [&str; 2] = ["one-card", "three-card"];

/// Registry of spread layouts.
///
/// ## Example
///
/// ```
/// use tarot_spread::spreads::SpreadCatalog;
///
/// let catalog = SpreadCatalog::builtin();
///
/// assert_eq!(catalog.get("one-card").unwrap().size(), 1);
/// assert_eq!(catalog.get("ten-card").unwrap().size(), 10);
/// assert!(catalog.get("unknown-id").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpreadCatalog {
    layouts: Vec<SpreadLayout>,
    by_id: FxHashMap<String, usize>,
}

impl SpreadCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in layouts.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for layout in builtin_layouts() {
            catalog.register(layout).expect("built-in layouts are well formed");
        }
        catalog
    }

    /// Add a layout.
    ///
    /// Rejects an empty position list, an id that is already taken or holds
    /// a `:`, and position labels longer than `max_position_label_chars`.
    pub fn register(&mut self, layout: SpreadLayout) -> Result<()> {
        if layout.positions.is_empty() {
            return Err(SpreadError::InvalidConfig(format!(
                "layout '{}' has no positions",
                layout.id
            )));
        }
        if layout.id.is_empty() || layout.id.contains(':') {
            return Err(SpreadError::InvalidConfig(format!(
                "layout id '{}' must be non-empty and free of ':'",
                layout.id
            )));
        }
        let max_label = max_position_label_chars(layout.size());
        if let Some(label) = layout.positions.iter().find(|p| p.chars().count() > max_label) {
            return Err(SpreadError::InvalidConfig(format!(
                "layout '{}': position label '{}' exceeds {} characters",
                layout.id, label, max_label
            )));
        }
        if self.by_id.contains_key(&layout.id) {
            return Err(SpreadError::InvalidConfig(format!(
                "layout '{}' already registered",
                layout.id
            )));
        }
        self.by_id.insert(layout.id.clone(), self.layouts.len());
        self.layouts.push(layout);
        Ok(())
    }

    /// Layout identifiers in registration order.
    pub fn layouts(&self) -> impl Iterator<Item = &str> {
        self.layouts.iter().map(|l| l.id.as_str())
    }

    /// Iterate over the layouts themselves.
    pub fn iter(&self) -> impl Iterator<Item = &SpreadLayout> {
        self.layouts.iter()
    }

    /// Get a layout by id.
    pub fn get(&self, id: &str) -> Result<&SpreadLayout> {
        self.by_id
            .get(id)
            .map(|&i| &self.layouts[i])
            .ok_or_else(|| SpreadError::layout_not_found(id))
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Layouts whose topic matches words in the question.
    ///
    /// Falls back to the single-card and three-card layouts. Only layouts
    /// present in this catalog are returned.
    pub fn recommend(&self, question: &str) -> Vec<&SpreadLayout> {
        let question = question.to_lowercase();

        let mut ids: Vec<&str> = TOPICS
            .iter()
            .filter(|(_, words)| words.iter().any(|w| question.contains(w)))
            .map(|(id, _)| *id)
            .collect();
        if ids.is_empty() {
            ids.extend(DEFAULT_RECOMMENDATIONS);
        }

        ids.into_iter().filter_map(|id| self.get(id).ok()).collect()
    }

    /// Pick a layout uniformly at random.
    pub fn random_layout(&self, rng: &mut DrawRng) -> Option<&SpreadLayout> {
        if self.layouts.is_empty() {
            return None;
        }
        Some(&self.layouts[rng.gen_range_usize(0..self.layouts.len())])
    }
}

fn builtin_layouts() -> Vec<SpreadLayout> {
    vec![
        SpreadLayout::new("one-card", "Card of the Day", ["General advice"])
            .with_description("One card giving general advice or showing the energy of the day")
            .with_emoji("🃏"),
        SpreadLayout::new("three-card", "Past, Present, Future", ["Past", "Present", "Future"])
            .with_description(
                "Three cards showing the influence of the past, the present situation and a possible future",
            )
            .with_emoji("🔮"),
        SpreadLayout::new(
            "decision",
            "Making a Decision",
            ["Current situation", "Option A", "Option B", "Advice"],
        )
        .with_description("Helps weigh an important decision")
        .with_emoji("⚖️"),
        SpreadLayout::new(
            "love",
            "Love Spread",
            [
                "Your feelings",
                "Your partner's feelings",
                "What binds you",
                "Obstacles",
                "Prospects of the relationship",
            ],
        )
        .with_description("Five cards for questions of love and relationships")
        .with_emoji("💕"),
        SpreadLayout::new(
            "chakra",
            "Chakra Spread",
            [
                "Muladhara (root)",
                "Svadhisthana (sacral)",
                "Manipura (solar plexus)",
                "Anahata (heart)",
                "Vishuddha (throat)",
                "Ajna (third eye)",
                "Sahasrara (crown)",
            ],
        )
        .with_description("The energetic state of the seven main chakras")
        .with_emoji("🌈"),
        SpreadLayout::new(
            "ten-card",
            "Celtic Cross",
            [
                "Current situation",
                "Obstacle or challenge",
                "Distant past",
                "Recent past",
                "Possible outcome",
                "Near future",
                "Your approach",
                "External influences",
                "Hopes and fears",
                "Final outcome",
            ],
        )
        .with_description("A full ten-card spread for a deep look at the situation")
        .with_emoji("✨"),
        SpreadLayout::new(
            "year-ahead",
            "Year Ahead",
            [
                "January", "February", "March", "April", "May", "June", "July", "August",
                "September", "October", "November", "December",
            ],
        )
        .with_description("A forecast for each month of the coming year")
        .with_emoji("📅"),
    ]
}
