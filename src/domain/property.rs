// src/domain/property.rs

use crate::cadastral::CadastralRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

/// Renovation / interior state, ordered from most to least value-adding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishQuality {
    Design,
    Good,
    Acceptable,
    SmallReform,
    FullReform,
}

impl FromStr for FinishQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "design" => Ok(Self::Design),
            "good" => Ok(Self::Good),
            "acceptable" => Ok(Self::Acceptable),
            "small_reform" => Ok(Self::SmallReform),
            "full_reform" => Ok(Self::FullReform),
            other => Err(format!("unknown finish quality '{other}'")),
        }
    }
}

/// Property attributes accumulated by the wizard.
///
/// Every field may be absent at any point; the valuation engine substitutes
/// defaults instead of rejecting a partial snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyAttributes {
    // Location
    #[serde(deserialize_with = "lenient::postal_code")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub longitude: Option<f64>,

    // Identity
    #[serde(deserialize_with = "lenient::string")]
    pub cadastral_reference: Option<String>,

    // Physical
    #[serde(deserialize_with = "lenient::number")]
    pub surface: Option<f64>,
    #[serde(deserialize_with = "lenient::integer")]
    pub construction_year: Option<i32>,
    #[serde(deserialize_with = "lenient::count")]
    pub bedrooms: Option<u32>,
    #[serde(deserialize_with = "lenient::count")]
    pub bathrooms: Option<u32>,

    // Classification
    #[serde(deserialize_with = "lenient::string")]
    pub property_type: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub building_type: Option<String>,

    // Enrichments
    #[serde(deserialize_with = "lenient::tags")]
    pub extras: Vec<String>,
    #[serde(deserialize_with = "lenient::finish")]
    pub finish_quality: Option<FinishQuality>,
}

impl PropertyAttributes {
    /// Surface only counts when it is a positive, finite number.
    pub fn usable_surface(&self) -> Option<f64> {
        self.surface.filter(|s| s.is_finite() && *s > 0.0)
    }

    pub fn has_coordinates(&self) -> bool {
        self.latitude.is_some_and(f64::is_finite) && self.longitude.is_some_and(f64::is_finite)
    }

    /// Extras trimmed, without blanks or case-insensitive duplicates, sorted.
    pub fn normalized_extras(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        let mut out: Vec<String> = self
            .extras
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .filter(|e| seen.insert(e.to_lowercase()))
            .map(str::to_string)
            .collect();
        out.sort();
        out
    }

    /// Returns a new snapshot with the registry record's known values applied.
    ///
    /// Blank strings in the record never overwrite what the user entered, and
    /// wizard-only fields (rooms, extras, finish) are kept as they are.
    pub fn with_cadastral(&self, record: &CadastralRecord) -> Self {
        let mut next = self.clone();

        overwrite(&mut next.cadastral_reference, &record.cadastral_reference);
        overwrite(&mut next.postal_code, &record.postal_code);
        overwrite(&mut next.city, &record.municipality);
        overwrite(&mut next.property_type, &record.property_type);
        overwrite(&mut next.building_type, &record.building_type);

        if record.surface > 0.0 {
            next.surface = Some(record.surface);
        }
        if record.construction_year > 0 {
            next.construction_year = Some(record.construction_year);
        }
        if let (Some(lat), Some(lon)) = (record.latitude, record.longitude) {
            next.latitude = Some(lat);
            next.longitude = Some(lon);
        }

        next
    }
}

fn overwrite(slot: &mut Option<String>, value: &str) {
    let value = value.trim();
    if !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

/// Three-point estimate. Amounts are whole euros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationResult {
    pub conservative: i64,
    pub estimated: i64,
    pub optimistic: i64,
    pub price_per_area: i64,
    pub confidence: u8,
}

/// Wizard payloads come from hand-filled forms: numbers arrive as strings,
/// selects arrive blank. Anything unusable becomes `None`.
mod lenient {
    use super::FinishQuality;
    use crate::cadastral::fields::{pad_postal_code, parse_number};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn value<'de, D: Deserializer<'de>>(d: D) -> Result<Value, D::Error> {
        Ok(Option::<Value>::deserialize(d)?.unwrap_or(Value::Null))
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(match value(d)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    pub fn postal_code<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        Ok(string(d)?.map(|code| pad_postal_code(&code)))
    }

    pub fn number<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        Ok(parse_number(&value(d)?))
    }

    pub fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<Option<i32>, D::Error> {
        Ok(parse_number(&value(d)?)
            .filter(|n| n.fract() == 0.0 && *n >= i32::MIN as f64 && *n <= i32::MAX as f64)
            .map(|n| n as i32))
    }

    pub fn count<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
        Ok(parse_number(&value(d)?)
            .filter(|n| n.fract() == 0.0 && *n >= 0.0 && *n <= u32::MAX as f64)
            .map(|n| n as u32))
    }

    pub fn tags<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
        Ok(match value(d)? {
            Value::Array(items) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            Value::String(s) => s.split(',').map(|t| t.trim().to_string()).collect(),
            _ => Vec::new(),
        })
    }

    pub fn finish<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FinishQuality>, D::Error> {
        Ok(match value(d)? {
            Value::String(s) => s.parse().ok(),
            _ => None,
        })
    }
}
