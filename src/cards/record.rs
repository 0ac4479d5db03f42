//! Card records - static card content.
//!
//! A `CardRecord` holds everything the engine needs to render one card:
//! its canonical name, arcana, both meanings and an optional artwork file.
//! Records are owned by the `CardDeck` and never mutated after load.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Stable position of a card in its deck.
///
/// Ordering carries no meaning for readings, but image file names are
/// derived from it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardIndex(pub u32);

impl CardIndex {
    /// Create a new card index.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Get the index as a usize for slice access.
    #[must_use]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CardIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}

/// Major or minor arcana.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arcana {
    Major,
    Minor,
}

/// Concrete image identifier handed to the transport.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(pub String);

impl ImageRef {
    /// Resolve an image file name against a directory.
    #[must_use]
    pub fn resolve(dir: &str, file: &str) -> Self {
        if dir.is_empty() {
            return Self(file.to_string());
        }
        Self(Path::new(dir).join(file).to_string_lossy().into_owned())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Static card content.
///
/// ## Example
///
/// ```
/// use tarot_spread::cards::{Arcana, CardRecord};
///
/// let fool = CardRecord::new("The_Fool", Arcana::Major)
///     .with_meanings("New beginnings", "Recklessness")
///     .with_keywords(["beginnings", "spontaneity"]);
///
/// assert_eq!(fool.display_title(), "The Fool");
/// assert_eq!(fool.meaning(true), "Recklessness");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Position in the deck, assigned on load.
    pub index: CardIndex,

    /// Canonical name, unique within a deck.
    pub name: String,

    /// Display title. Falls back to the canonical name.
    pub title: Option<String>,

    pub arcana: Arcana,

    /// Meaning when drawn upright.
    pub upright: String,

    /// Meaning when drawn reversed.
    pub reversed: String,

    pub keywords: Vec<String>,

    /// Artwork file name, relative to the configured image directory.
    pub image: Option<String>,
}

impl CardRecord {
    /// Create a record with empty meanings.
    ///
    /// The index is assigned when the record is loaded into a deck.
    #[must_use]
    pub fn new(name: impl Into<String>, arcana: Arcana) -> Self {
        Self {
            index: CardIndex::default(),
            name: name.into(),
            title: None,
            arcana,
            upright: String::new(),
            reversed: String::new(),
            keywords: Vec::new(),
            image: None,
        }
    }

    #[must_use]
    pub fn with_meanings(mut self, upright: impl Into<String>, reversed: impl Into<String>) -> Self {
        self.upright = upright.into();
        self.reversed = reversed.into();
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_image(mut self, file: impl Into<String>) -> Self {
        self.image = Some(file.into());
        self
    }

    /// Title shown to users.
    #[must_use]
    pub fn display_title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => self.name.replace('_', " "),
        }
    }

    /// Meaning text for the given orientation.
    #[must_use]
    pub fn meaning(&self, reversed: bool) -> &str {
        if reversed {
            &self.reversed
        } else {
            &self.upright
        }
    }

    /// Image file name derived from index and canonical name.
    ///
    /// Matches the `<index>.<name>.png` layout of the card artwork folder.
    #[must_use]
    pub fn conventional_image_name(&self) -> String {
        format!("{}.{}.png", self.index.0, self.name)
    }

    #[must_use]
    pub fn is_major(&self) -> bool {
        self.arcana == Arcana::Major
    }
}
