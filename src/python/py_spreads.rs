//! Spread bindings for Python.

use std::sync::Arc;

use pyo3::prelude::*;

use super::py_cards::{PyCardDeck, PyCardRecord};
use crate::core::{DrawRng, EngineConfig};
use crate::spreads::{PositionedCard, ResolvedSpread, SpreadBuilder, SpreadCatalog, SpreadLayout};

/// Python wrapper for SpreadLayout.
#[pyclass(name = "SpreadLayout")]
#[derive(Clone, Debug)]
pub struct PySpreadLayout(pub SpreadLayout);

#[pymethods]
impl PySpreadLayout {
    #[getter]
    fn id(&self) -> String {
        self.0.id.clone()
    }

    #[getter]
    fn name(&self) -> String {
        self.0.name.clone()
    }

    #[getter]
    fn description(&self) -> String {
        self.0.description.clone()
    }

    #[getter]
    fn positions(&self) -> Vec<String> {
        self.0.positions.clone()
    }

    fn __len__(&self) -> usize {
        self.0.size()
    }

    fn __repr__(&self) -> String {
        format!("SpreadLayout({:?}, size={})", self.0.id, self.0.size())
    }
}

/// Python wrapper for SpreadCatalog.
#[pyclass(name = "SpreadCatalog")]
#[derive(Clone, Debug)]
pub struct PySpreadCatalog(pub Arc<SpreadCatalog>);

#[pymethods]
impl PySpreadCatalog {
    /// The built-in layouts.
    #[new]
    fn new() -> Self {
        Self(Arc::new(SpreadCatalog::builtin()))
    }

    /// Layout ids in menu order.
    fn layouts(&self) -> Vec<String> {
        self.0.layouts().map(str::to_string).collect()
    }

    fn get(&self, id: &str) -> PyResult<PySpreadLayout> {
        self.0
            .get(id)
            .map(|layout| PySpreadLayout(layout.clone()))
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyKeyError, _>(e.to_string()))
    }

    /// Layouts suited to a question.
    fn recommend(&self, question: &str) -> Vec<PySpreadLayout> {
        self.0
            .recommend(question)
            .into_iter()
            .map(|layout| PySpreadLayout(layout.clone()))
            .collect()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }
}

/// A card bound to its position.
#[pyclass(name = "PositionedCard")]
#[derive(Clone, Debug)]
pub struct PyPositionedCard(pub PositionedCard);

#[pymethods]
impl PyPositionedCard {
    #[getter]
    fn position(&self) -> String {
        self.0.position.clone()
    }

    #[getter]
    fn card(&self) -> PyCardRecord {
        PyCardRecord(self.0.card.record.as_ref().clone())
    }

    #[getter]
    fn reversed(&self) -> bool {
        self.0.is_reversed()
    }

    #[getter]
    fn interpretation(&self) -> String {
        self.0.interpretation.clone()
    }

    #[getter]
    fn image(&self) -> Option<String> {
        self.0.image.as_ref().map(|image| image.as_str().to_string())
    }

    fn __repr__(&self) -> String {
        format!(
            "PositionedCard({:?}, {:?}, reversed={})",
            self.0.position,
            self.0.card_name(),
            self.0.is_reversed()
        )
    }
}

/// Python wrapper for ResolvedSpread.
#[pyclass(name = "ResolvedSpread")]
#[derive(Clone, Debug)]
pub struct PyResolvedSpread(pub ResolvedSpread);

#[pymethods]
impl PyResolvedSpread {
    #[getter]
    fn layout_id(&self) -> String {
        self.0.layout_id.clone()
    }

    #[getter]
    fn name(&self) -> String {
        self.0.name.clone()
    }

    #[getter]
    fn question(&self) -> Option<String> {
        self.0.question.clone()
    }

    #[getter]
    fn cards(&self) -> Vec<PyPositionedCard> {
        self.0.cards().iter().cloned().map(PyPositionedCard).collect()
    }

    /// The whole spread as one text.
    fn render_text(&self) -> String {
        self.0.render_text()
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }
}

/// Builds spreads from a deck and the built-in catalog.
#[pyclass(name = "SpreadBuilder")]
pub struct PySpreadBuilder {
    inner: SpreadBuilder,
    rng: DrawRng,
}

#[pymethods]
impl PySpreadBuilder {
    /// # Arguments
    /// - deck: Card deck to draw from
    /// - seed: Fixed seed for reproducible spreads (default: entropy)
    /// - reversed_probability: Chance each card is reversed (default: 0.3)
    /// - interpretation_max_chars: Truncation length (default: 500)
    #[new]
    #[pyo3(signature = (
        deck,
        catalog = None,
        seed = None,
        reversed_probability = 0.3,
        interpretation_max_chars = 500
    ))]
    fn new(
        deck: &PyCardDeck,
        catalog: Option<&PySpreadCatalog>,
        seed: Option<u64>,
        reversed_probability: f64,
        interpretation_max_chars: usize,
    ) -> PyResult<Self> {
        let config = EngineConfig::default()
            .with_reversed_probability(reversed_probability)
            .with_interpretation_max_chars(interpretation_max_chars);
        config
            .validate()
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))?;

        let catalog = catalog
            .map(|c| c.0.clone())
            .unwrap_or_else(|| Arc::new(SpreadCatalog::builtin()));

        Ok(Self {
            inner: SpreadBuilder::new(deck.0.clone(), catalog, &config),
            rng: DrawRng::from_seed_or_entropy(seed),
        })
    }

    /// Draw a spread for `layout_id`.
    #[pyo3(signature = (layout_id, question = None))]
    fn build(&mut self, layout_id: &str, question: Option<&str>) -> PyResult<PyResolvedSpread> {
        self.inner
            .build_for(&mut self.rng, layout_id, question)
            .map(PyResolvedSpread)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string()))
    }
}
