// src/valuation/adjustments.rs
//
// Each calculator maps attributes to a signed fraction of the base price per
// m². Missing input means no adjustment.

use crate::domain::{FinishQuality, PropertyAttributes};

/// Ceiling for the summed extras adjustment.
pub const EXTRAS_CAP: f64 = 0.25;

/// Contribution of any extra not in `EXTRA_VALUES`.
pub const UNKNOWN_EXTRA_VALUE: f64 = 0.01;

// Keys are lowercase; tags are matched after trimming and lowercasing.
const EXTRA_VALUES: &[(&str, f64)] = &[
    ("terraza", 0.05),
    ("amueblado", 0.02),
    ("trastero", 0.02),
    ("piscina", 0.04),
    ("parking", 0.05),
    ("jardín", 0.04),
    ("cerca del centro", 0.02),
    ("urbanización cerrada", 0.03),
    ("buenas vistas", 0.04),
    ("seguridad", 0.02),
    ("instalaciones deportivas", 0.02),
    ("conserje", 0.02),
    ("aire acondicionado", 0.02),
    ("calefacción", 0.02),
    ("domótica", 0.03),
    ("ascensor", 0.02),
    ("balcón", 0.02),
];

/// The individual factors, kept apart so reports can show them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Adjustments {
    pub age: f64,
    pub extras: f64,
    pub finish: f64,
    pub size: f64,
    pub rooms: f64,
}

impl Adjustments {
    pub fn for_attributes(attrs: &PropertyAttributes, current_year: i32) -> Self {
        Self {
            age: age_adjustment(attrs.construction_year, current_year),
            extras: extras_adjustment(&attrs.extras),
            finish: finish_adjustment(attrs.finish_quality),
            size: size_adjustment(attrs.usable_surface()),
            rooms: room_density_adjustment(
                attrs.usable_surface(),
                attrs.bedrooms,
                attrs.bathrooms,
            ),
        }
    }

    /// `1 + Σ factors`. Deliberately unclamped.
    pub fn multiplier(&self) -> f64 {
        1.0 + self.age + self.extras + self.finish + self.size + self.rooms
    }
}

pub fn age_adjustment(construction_year: Option<i32>, current_year: i32) -> f64 {
    let Some(year) = construction_year else {
        return 0.0;
    };
    // Widened so extreme years cannot overflow.
    match i64::from(current_year) - i64::from(year) {
        age if age <= 0 => 0.15,
        age if age <= 5 => 0.10,
        age if age <= 10 => 0.05,
        age if age <= 20 => 0.0,
        age if age <= 40 => -0.05,
        age if age <= 60 => -0.10,
        _ => -0.12,
    }
}

pub fn extra_value(tag: &str) -> f64 {
    let key = tag.trim().to_lowercase();
    EXTRA_VALUES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| *v)
        .unwrap_or(UNKNOWN_EXTRA_VALUE)
}

/// Sum of per-tag values, capped at `EXTRAS_CAP`. Blank tags are ignored and
/// repeated tags count once.
pub fn extras_adjustment(extras: &[String]) -> f64 {
    let mut seen = std::collections::HashSet::new();
    let total: f64 = extras
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty() && seen.insert(e.to_lowercase()))
        .map(extra_value)
        .sum();
    total.min(EXTRAS_CAP)
}

pub fn finish_adjustment(finish: Option<FinishQuality>) -> f64 {
    match finish {
        Some(FinishQuality::Design) => 0.15,
        Some(FinishQuality::Good) => 0.05,
        Some(FinishQuality::Acceptable) | None => 0.0,
        Some(FinishQuality::SmallReform) => -0.10,
        Some(FinishQuality::FullReform) => -0.20,
    }
}

/// Smaller homes sell for more per m².
pub fn size_adjustment(surface: Option<f64>) -> f64 {
    let Some(surface) = surface else {
        return 0.0;
    };
    if surface < 50.0 {
        0.10
    } else if surface < 80.0 {
        0.05
    } else if surface < 120.0 {
        0.0
    } else if surface < 180.0 {
        -0.03
    } else if surface < 250.0 {
        -0.05
    } else {
        -0.08
    }
}

pub fn room_density_adjustment(
    surface: Option<f64>,
    bedrooms: Option<u32>,
    bathrooms: Option<u32>,
) -> f64 {
    let (Some(surface), Some(bedrooms)) = (surface, bedrooms) else {
        return 0.0;
    };
    if bedrooms == 0 {
        return 0.0;
    }

    let area_per_bedroom = surface / bedrooms as f64;
    if area_per_bedroom < 15.0 {
        -0.05
    } else if area_per_bedroom > 50.0 {
        -0.02
    } else if bathrooms.unwrap_or(0) >= 2 && surface >= 100.0 {
        0.02
    } else {
        0.0
    }
}
