// src/valuation/engine.rs

use crate::domain::{PropertyAttributes, ValuationResult};
use crate::valuation::adjustments::Adjustments;
use crate::valuation::confidence::confidence;
use crate::valuation::zones::{self, ZoneMatch};
use chrono::{Datelike, Utc};
use tracing::debug;

/// Surface assumed when none is known.
pub const DEFAULT_SURFACE: f64 = 100.0;
/// Width of the band around the estimate.
pub const RANGE_MARGIN: f64 = 0.10;

/// Full working of one valuation, for reports and debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct Valuation {
    pub zone: ZoneMatch,
    pub adjustments: Adjustments,
    pub surface: f64,
    pub result: ValuationResult,
}

/// Values a snapshot as of the current calendar year.
pub fn valuate(attrs: &PropertyAttributes) -> ValuationResult {
    valuate_as_of(attrs, Utc::now().year())
}

/// Values a snapshot with property age measured against `current_year`.
/// Pure: identical inputs give identical results.
pub fn valuate_as_of(attrs: &PropertyAttributes, current_year: i32) -> ValuationResult {
    explain(attrs, current_year).result
}

pub fn explain(attrs: &PropertyAttributes, current_year: i32) -> Valuation {
    let zone = zones::lookup(attrs.postal_code.as_deref(), attrs.city.as_deref());
    let adjustments = Adjustments::for_attributes(attrs, current_year);
    let surface = attrs.usable_surface().unwrap_or(DEFAULT_SURFACE);

    let multiplier = adjustments.multiplier();
    let adjusted_price = zone.price_per_area * multiplier;
    let estimated = adjusted_price * surface;

    let result = ValuationResult {
        conservative: to_euros(estimated * (1.0 - RANGE_MARGIN)),
        estimated: to_euros(estimated),
        optimistic: to_euros(estimated * (1.0 + RANGE_MARGIN)),
        price_per_area: to_euros(adjusted_price),
        confidence: confidence(attrs, &zone),
    };

    debug!(
        zone = ?zone.kind,
        base = zone.price_per_area,
        multiplier,
        surface,
        estimated = result.estimated,
        confidence = result.confidence,
        "valuation computed"
    );

    Valuation {
        zone,
        adjustments,
        surface,
        result,
    }
}

fn to_euros(amount: f64) -> i64 {
    amount.round() as i64
}
