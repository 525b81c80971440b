//! Pricing model: zone baseline, attribute adjustments, confidence.
//!
//! Everything here is pure and total. Missing attributes degrade to defaults
//! rather than producing errors.

pub mod adjustments;
pub mod confidence;
pub mod engine;
pub mod zones;

pub use engine::{explain, valuate, valuate_as_of, Valuation};
pub use zones::{lookup, ZoneEntry, ZoneMatch, ZoneMatchKind};
