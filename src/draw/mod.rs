//! Card drawing: distinct cards, independent orientations.
//!
//! The engine is a pure function of the deck and the random source it is
//! handed. It never truncates or repeats to satisfy a request.

mod engine;

pub use engine::{DrawEngine, DrawnCard};
