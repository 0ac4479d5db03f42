//! Loading the card data source.
//!
//! Two formats are accepted:
//! - a JSON array of card objects (the editable source)
//! - a bincode snapshot written by `CardDeck::to_snapshot` (`.bin`)
//!
//! Any failure here is a startup failure. Nothing in this module falls back
//! to an empty deck.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::deck::CardDeck;
use super::record::{Arcana, CardRecord};
use crate::error::DeckError;

/// One card as it appears in the JSON source.
#[derive(Debug, Deserialize)]
struct SourceCard {
    name: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(alias = "category")]
    arcana: Arcana,
    upright: String,
    reversed: String,
    #[serde(default)]
    keywords: Vec<String>,
    #[serde(default)]
    image: Option<String>,
}

impl From<SourceCard> for CardRecord {
    fn from(card: SourceCard) -> Self {
        let mut record = CardRecord::new(card.name, card.arcana)
            .with_meanings(card.upright, card.reversed)
            .with_keywords(card.keywords);
        record.title = card.title;
        record.image = card.image;
        record
    }
}

/// Reads a `CardDeck` from the data source.
#[derive(Clone, Debug, Default)]
pub struct DeckLoader {
    derive_image_names: bool,
}

impl DeckLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Give cards without an explicit image the `<index>.<name>.png` file.
    pub fn derive_image_names(mut self, derive: bool) -> Self {
        self.derive_image_names = derive;
        self
    }

    /// Parse a JSON array of cards.
    pub fn load_json_str(&self, json: &str) -> Result<CardDeck, DeckError> {
        let cards: Vec<SourceCard> = serde_json::from_str(json)?;
        let records = cards.into_iter().map(CardRecord::from).collect();
        self.finish(CardDeck::from_records(records)?)
    }

    /// Load a deck file, choosing the format by extension.
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<CardDeck, DeckError> {
        let path = path.as_ref();
        let deck = match path.extension().and_then(|e| e.to_str()) {
            Some("bin") => {
                let bytes = fs::read(path)?;
                self.finish(CardDeck::from_snapshot(&bytes)?)?
            }
            _ => {
                let json = fs::read_to_string(path)?;
                self.load_json_str(&json)?
            }
        };

        let stats = deck.statistics();
        info!(
            path = %path.display(),
            total = stats.total,
            major = stats.major,
            minor = stats.minor,
            "Loaded card deck"
        );
        Ok(deck)
    }

    fn finish(&self, mut deck: CardDeck) -> Result<CardDeck, DeckError> {
        if self.derive_image_names {
            deck.assign_conventional_images();
        }
        Ok(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"[
        {"name": "The_Fool", "title": "The Fool", "arcana": "major",
         "upright": "New beginnings", "reversed": "Recklessness",
         "keywords": ["beginnings"]},
        {"name": "Ace_of_Cups", "category": "minor",
         "upright": "New love", "reversed": "Blocked feelings",
         "image": "custom.png"}
    ]"#;

    #[test]
    fn test_load_json() {
        let deck = DeckLoader::new().load_json_str(SOURCE).unwrap();
        assert_eq!(deck.size(), 2);

        let fool = deck.record_at(0).unwrap();
        assert_eq!(fool.display_title(), "The Fool");
        assert_eq!(fool.keywords, vec!["beginnings".to_string()]);
        assert!(fool.image.is_none());

        let ace = deck.record_by_name("Ace_of_Cups").unwrap();
        assert_eq!(ace.arcana, Arcana::Minor);
        assert_eq!(ace.image.as_deref(), Some("custom.png"));
    }

    #[test]
    fn test_derive_image_names_keeps_explicit() {
        let deck = DeckLoader::new()
            .derive_image_names(true)
            .load_json_str(SOURCE)
            .unwrap();

        assert_eq!(deck.record_at(0).unwrap().image.as_deref(), Some("0.The_Fool.png"));
        assert_eq!(deck.record_at(1).unwrap().image.as_deref(), Some("custom.png"));
    }

    #[test]
    fn test_malformed_json_is_error() {
        let result = DeckLoader::new().load_json_str(r#"[{"name": "The_Fool"}]"#);
        assert!(matches!(result, Err(DeckError::Parse(_))));
    }

    #[test]
    fn test_empty_source_is_error() {
        assert!(matches!(DeckLoader::new().load_json_str("[]"), Err(DeckError::Empty)));
    }

    #[test]
    fn test_missing_file_is_error() {
        let result = DeckLoader::new().load_path("/nonexistent/deck.json");
        assert!(matches!(result, Err(DeckError::Io(_))));
    }

    #[test]
    fn test_load_snapshot_file() {
        let deck = DeckLoader::new().load_json_str(SOURCE).unwrap();
        let path = std::env::temp_dir().join(format!("tarot-deck-{}.bin", std::process::id()));
        fs::write(&path, deck.to_snapshot().unwrap()).unwrap();

        let loaded = DeckLoader::new().load_path(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(loaded.size(), 2);
        assert_eq!(loaded.record_at(1).unwrap().name, "Ace_of_Cups");
    }
}
