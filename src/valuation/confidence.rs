// src/valuation/confidence.rs

use crate::domain::PropertyAttributes;
use crate::valuation::zones::ZoneMatch;

pub const BASE_CONFIDENCE: u8 = 50;
/// Estimates never claim full certainty.
pub const MAX_CONFIDENCE: u8 = 95;

/// Completeness-based reliability score in `[50, 95]`.
pub fn confidence(attrs: &PropertyAttributes, zone: &ZoneMatch) -> u8 {
    let present = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());

    let mut score = u32::from(BASE_CONFIDENCE);

    if zone.is_exact() {
        score += 15;
    } else if present(&attrs.postal_code) {
        score += 5;
    }
    if present(&attrs.city) {
        score += 5;
    }
    if attrs.has_coordinates() {
        score += 5;
    }
    if attrs.usable_surface().is_some() {
        score += 5;
    }
    if attrs.construction_year.is_some() {
        score += 5;
    }
    if present(&attrs.cadastral_reference) {
        score += 5;
    }
    if attrs.bedrooms.is_some() {
        score += 3;
    }
    if attrs.bathrooms.is_some() {
        score += 2;
    }
    if attrs.extras.iter().any(|e| !e.trim().is_empty()) {
        score += 3;
    }
    if attrs.finish_quality.is_some() {
        score += 2;
    }

    score.min(u32::from(MAX_CONFIDENCE)) as u8
}
