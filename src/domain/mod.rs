pub mod property;

pub use property::{FinishQuality, PropertyAttributes, ValuationResult};
