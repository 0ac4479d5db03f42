//! The card deck: an immutable table of card records.
//!
//! A `CardDeck` is built once at startup and then shared read-only (behind an
//! `Arc`) by every request. Construction is the only place records can enter,
//! so an empty or ambiguous deck never reaches the draw engine.

use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::record::{Arcana, CardIndex, CardRecord};
use crate::error::{DeckError, Result, SpreadError};

/// Card counts by arcana.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStatistics {
    pub total: usize,
    pub major: usize,
    pub minor: usize,
}

/// Immutable table of card records.
///
/// Records are reference-counted so drawn cards can point at them without
/// borrowing the deck.
///
/// ## Example
///
/// ```
/// use tarot_spread::cards::{Arcana, CardDeck, CardRecord};
///
/// let deck = CardDeck::from_records(vec![
///     CardRecord::new("The_Fool", Arcana::Major),
///     CardRecord::new("Ace_of_Cups", Arcana::Minor),
/// ])
/// .unwrap();
///
/// assert_eq!(deck.size(), 2);
/// assert_eq!(deck.record_by_name("Ace_of_Cups").unwrap().index.0, 1);
/// assert_eq!(deck.statistics().major, 1);
/// ```
#[derive(Debug)]
pub struct CardDeck {
    records: Vec<Arc<CardRecord>>,
    by_name: FxHashMap<String, usize>,
    stats: OnceLock<DeckStatistics>,
}

impl CardDeck {
    /// Build a deck from records in source order.
    ///
    /// Indices are reassigned to match positions. Fails on an empty list or a
    /// repeated canonical name.
    pub fn from_records(mut records: Vec<CardRecord>) -> std::result::Result<Self, DeckError> {
        if records.is_empty() {
            return Err(DeckError::Empty);
        }

        let mut by_name = FxHashMap::default();
        for (i, record) in records.iter_mut().enumerate() {
            record.index = CardIndex::new(i as u32);
            if by_name.insert(record.name.clone(), i).is_some() {
                return Err(DeckError::DuplicateName(record.name.clone()));
            }
        }

        Ok(Self {
            records: records.into_iter().map(Arc::new).collect(),
            by_name,
            stats: OnceLock::new(),
        })
    }

    /// Number of cards in the deck. Always at least one.
    #[must_use]
    pub fn size(&self) -> usize {
        self.records.len()
    }

    /// Get a record by index.
    pub fn record_at(&self, index: usize) -> Result<&CardRecord> {
        self.records
            .get(index)
            .map(AsRef::as_ref)
            .ok_or_else(|| SpreadError::card_not_found(index.to_string()))
    }

    /// Shared handle to a record, for values that outlive a borrow.
    pub(crate) fn shared(&self, index: usize) -> Option<Arc<CardRecord>> {
        self.records.get(index).cloned()
    }

    /// Get a record by canonical name.
    #[must_use]
    pub fn record_by_name(&self, name: &str) -> Option<&CardRecord> {
        self.by_name.get(name).map(|&i| self.records[i].as_ref())
    }

    /// Card counts by arcana, computed on first use.
    pub fn statistics(&self) -> DeckStatistics {
        *self.stats.get_or_init(|| {
            let major = self.records.iter().filter(|r| r.is_major()).count();
            DeckStatistics {
                total: self.records.len(),
                major,
                minor: self.records.len() - major,
            }
        })
    }

    /// Iterate over records in deck order.
    pub fn iter(&self) -> impl Iterator<Item = &CardRecord> {
        self.records.iter().map(AsRef::as_ref)
    }

    /// Records of one arcana, in deck order.
    pub fn records_in(&self, arcana: Arcana) -> impl Iterator<Item = &CardRecord> {
        self.iter().filter(move |r| r.arcana == arcana)
    }

    /// Give every record without artwork its conventional image file.
    pub(crate) fn assign_conventional_images(&mut self) {
        for record in &mut self.records {
            if record.image.is_none() {
                let file = record.conventional_image_name();
                Arc::make_mut(record).image = Some(file);
            }
        }
    }

    /// Serialize the records into a compact binary snapshot.
    pub fn to_snapshot(&self) -> std::result::Result<Vec<u8>, DeckError> {
        let records: Vec<&CardRecord> = self.iter().collect();
        Ok(bincode::serialize(&records)?)
    }

    /// Rebuild a deck from a binary snapshot.
    pub fn from_snapshot(bytes: &[u8]) -> std::result::Result<Self, DeckError> {
        let records: Vec<CardRecord> = bincode::deserialize(bytes)?;
        Self::from_records(records)
    }
}
