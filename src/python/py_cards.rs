//! Deck bindings for Python.

use std::sync::Arc;

use pyo3::prelude::*;

use crate::cards::{CardDeck, CardRecord, DeckLoader};

fn deck_err(err: crate::error::DeckError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(err.to_string())
}

/// Python wrapper for CardRecord.
#[pyclass(name = "CardRecord")]
#[derive(Clone, Debug)]
pub struct PyCardRecord(pub CardRecord);

#[pymethods]
impl PyCardRecord {
    #[getter]
    fn index(&self) -> usize {
        self.0.index.as_usize()
    }

    #[getter]
    fn name(&self) -> String {
        self.0.name.clone()
    }

    /// Display title, falling back to the canonical name.
    #[getter]
    fn title(&self) -> String {
        self.0.display_title()
    }

    #[getter]
    fn is_major(&self) -> bool {
        self.0.is_major()
    }

    #[getter]
    fn upright(&self) -> String {
        self.0.upright.clone()
    }

    #[getter]
    fn reversed(&self) -> String {
        self.0.reversed.clone()
    }

    #[getter]
    fn keywords(&self) -> Vec<String> {
        self.0.keywords.clone()
    }

    #[getter]
    fn image(&self) -> Option<String> {
        self.0.image.clone()
    }

    fn __repr__(&self) -> String {
        format!("CardRecord({}, {:?})", self.0.index.as_usize(), self.0.name)
    }
}

/// Python wrapper for CardDeck.
#[pyclass(name = "CardDeck")]
#[derive(Clone, Debug)]
pub struct PyCardDeck(pub Arc<CardDeck>);

#[pymethods]
impl PyCardDeck {
    /// The built-in 78-card deck.
    #[staticmethod]
    fn standard() -> Self {
        Self(Arc::new(CardDeck::standard()))
    }

    /// Load a deck from a JSON file or a `.bin` snapshot.
    #[staticmethod]
    #[pyo3(signature = (path, derive_image_names = true))]
    fn load(path: &str, derive_image_names: bool) -> PyResult<Self> {
        DeckLoader::new()
            .derive_image_names(derive_image_names)
            .load_path(path)
            .map(|deck| Self(Arc::new(deck)))
            .map_err(deck_err)
    }

    /// Parse a deck from a JSON string.
    #[staticmethod]
    fn from_json(json: &str) -> PyResult<Self> {
        DeckLoader::new()
            .load_json_str(json)
            .map(|deck| Self(Arc::new(deck)))
            .map_err(deck_err)
    }

    fn size(&self) -> usize {
        self.0.size()
    }

    fn record_at(&self, index: usize) -> PyResult<PyCardRecord> {
        self.0
            .record_at(index)
            .map(|record| PyCardRecord(record.clone()))
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyIndexError, _>(e.to_string()))
    }

    fn record_by_name(&self, name: &str) -> Option<PyCardRecord> {
        self.0.record_by_name(name).map(|record| PyCardRecord(record.clone()))
    }

    /// Returns (total, major, minor).
    fn statistics(&self) -> (usize, usize, usize) {
        let stats = self.0.statistics();
        (stats.total, stats.major, stats.minor)
    }

    /// Serialize to a binary snapshot.
    fn to_snapshot(&self) -> PyResult<Vec<u8>> {
        self.0.to_snapshot().map_err(deck_err)
    }

    fn __len__(&self) -> usize {
        self.0.size()
    }

    fn __repr__(&self) -> String {
        format!("CardDeck(size={})", self.0.size())
    }
}
