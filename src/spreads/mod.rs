//! Spreads: layouts, the catalog, and assembly of resolved spreads.
//!
//! ## Key Types
//!
//! - `SpreadLayout`: Named, ordered list of position labels
//! - `SpreadCatalog`: Registry of layouts (built-in or custom)
//! - `SpreadBuilder`: Draws cards and binds them to a layout's positions
//! - `ResolvedSpread`: The per-request result handed to delivery

pub mod builder;
pub mod catalog;
pub mod layout;
pub mod resolved;

pub use builder::{render_interpretation, SpreadBuilder};
pub use catalog::{max_position_label_chars, SpreadCatalog};
pub use layout::SpreadLayout;
pub use resolved::{PositionedCard, ResolvedSpread};
