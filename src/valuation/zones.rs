// src/valuation/zones.rs

use crate::cadastral::fields::pad_postal_code;
use serde::Serialize;
use tracing::debug;

/// Ordered price bracket attached to a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Low,
    Medium,
    High,
    Premium,
    Luxury,
}

/// One row of the reference price table, keyed by exact postal code.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneEntry {
    pub postal_code: &'static str,
    pub city: &'static str,
    pub zone: &'static str,
    pub price_per_area: f64,
    pub tier: Tier,
}

/// Nationwide constants backing the table.
///
/// `coastal_premium` and `island_premium` are published with the reference
/// data but not applied by `lookup`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceDefaults {
    pub country_average: f64,
    pub capital_average: f64,
    pub coastal_premium: f64,
    pub island_premium: f64,
}

pub const DEFAULTS: PriceDefaults = PriceDefaults {
    country_average: 2_000.0,
    capital_average: 3_900.0,
    coastal_premium: 0.15,
    island_premium: 0.20,
};

/// Discount applied when only the province prefix of the postal code matches.
pub const PROVINCE_MATCH_DISCOUNT: f64 = 0.15;

const fn zone(
    postal_code: &'static str,
    city: &'static str,
    zone: &'static str,
    price_per_area: f64,
    tier: Tier,
) -> ZoneEntry {
    ZoneEntry {
        postal_code,
        city,
        zone,
        price_per_area,
        tier,
    }
}

// Order matters: city and province fallbacks take the first matching row.
pub static ZONES: &[ZoneEntry] = &[
    // Madrid
    zone("28001", "Madrid", "Salamanca - Recoletos", 7_800.0, Tier::Luxury),
    zone("28004", "Madrid", "Centro - Malasaña", 5_900.0, Tier::Premium),
    zone("28006", "Madrid", "Salamanca - Castellana", 7_200.0, Tier::Luxury),
    zone("28010", "Madrid", "Chamberí - Almagro", 6_600.0, Tier::Luxury),
    zone("28012", "Madrid", "Centro - Lavapiés", 5_100.0, Tier::Premium),
    zone("28013", "Madrid", "Centro - Sol", 5_800.0, Tier::Premium),
    zone("28014", "Madrid", "Retiro - Jerónimos", 6_900.0, Tier::Luxury),
    zone("28020", "Madrid", "Tetuán - Cuatro Caminos", 4_600.0, Tier::High),
    zone("28028", "Madrid", "Salamanca - Guindalera", 5_300.0, Tier::Premium),
    zone("28039", "Madrid", "Tetuán - Bellas Vistas", 3_700.0, Tier::High),
    zone("28045", "Madrid", "Arganzuela - Delicias", 4_300.0, Tier::High),
    zone("28018", "Madrid", "Puente de Vallecas", 2_700.0, Tier::Medium),
    zone("28041", "Madrid", "Usera - Orcasur", 2_300.0, Tier::Medium),
    zone("28220", "Majadahonda", "Majadahonda", 3_900.0, Tier::High),
    zone("28903", "Getafe", "Getafe Centro", 2_500.0, Tier::Medium),
    // Barcelona
    zone("08001", "Barcelona", "Ciutat Vella - Raval", 4_300.0, Tier::High),
    zone("08007", "Barcelona", "Eixample - Dreta", 6_200.0, Tier::Luxury),
    zone("08008", "Barcelona", "Eixample - Esquerra", 5_600.0, Tier::Premium),
    zone("08013", "Barcelona", "Eixample - Sagrada Família", 4_700.0, Tier::High),
    zone("08021", "Barcelona", "Sarrià - Sant Gervasi", 6_000.0, Tier::Luxury),
    zone("08905", "L'Hospitalet de Llobregat", "Collblanc", 2_600.0, Tier::Medium),
    // Other capitals
    zone("46001", "Valencia", "Ciutat Vella", 3_400.0, Tier::High),
    zone("46004", "Valencia", "Eixample - Ruzafa", 3_100.0, Tier::High),
    zone("41001", "Sevilla", "Casco Antiguo", 3_300.0, Tier::High),
    zone("29001", "Málaga", "Centro Histórico", 3_900.0, Tier::Premium),
    zone("29600", "Marbella", "Marbella Centro", 4_800.0, Tier::Luxury),
    zone("48001", "Bilbao", "Abando", 3_800.0, Tier::Premium),
    zone("20004", "San Sebastián", "Centro", 6_300.0, Tier::Luxury),
    zone("07001", "Palma", "Casco Antiguo", 4_500.0, Tier::Premium),
    zone("07800", "Ibiza", "Eivissa Centro", 5_500.0, Tier::Luxury),
    zone("35001", "Las Palmas de Gran Canaria", "Vegueta", 2_400.0, Tier::Medium),
    zone("50001", "Zaragoza", "Casco Histórico", 2_200.0, Tier::Medium),
    zone("03001", "Alicante", "Centro", 2_300.0, Tier::Medium),
    zone("33001", "Oviedo", "Centro", 2_000.0, Tier::Medium),
    zone("47001", "Valladolid", "Centro", 2_100.0, Tier::Medium),
    zone("13001", "Ciudad Real", "Centro", 1_200.0, Tier::Low),
    zone("10001", "Cáceres", "Centro", 1_300.0, Tier::Low),
    zone("02001", "Albacete", "Centro", 1_400.0, Tier::Low),
];

/// How a baseline price was obtained. Declared in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneMatchKind {
    PostalCode,
    City,
    Province,
    National,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ZoneMatch {
    pub price_per_area: f64,
    pub kind: ZoneMatchKind,
    pub zone: Option<&'static ZoneEntry>,
}

impl ZoneMatch {
    pub fn is_exact(&self) -> bool {
        self.kind == ZoneMatchKind::PostalCode
    }
}

/// Best-available price per m² for a postal code and/or city.
///
/// Precedence: exact postal code, case-insensitive city, province prefix
/// (first three digits, discounted), nationwide average. Never fails.
pub fn lookup(postal_code: Option<&str>, city: Option<&str>) -> ZoneMatch {
    let postal_code = postal_code
        .map(pad_postal_code)
        .filter(|s| !s.is_empty());
    let postal_code = postal_code.as_deref();
    let city = city.map(str::trim).filter(|s| !s.is_empty());

    let found = postal_code
        .and_then(by_postal_code)
        .or_else(|| city.and_then(by_city))
        .or_else(|| postal_code.and_then(by_province));

    let found = found.unwrap_or(ZoneMatch {
        price_per_area: DEFAULTS.country_average,
        kind: ZoneMatchKind::National,
        zone: None,
    });

    debug!(
        postal_code = postal_code.unwrap_or(""),
        city = city.unwrap_or(""),
        kind = ?found.kind,
        price_per_area = found.price_per_area,
        "zone lookup"
    );
    found
}

fn by_postal_code(postal_code: &str) -> Option<ZoneMatch> {
    ZONES
        .iter()
        .find(|z| z.postal_code == postal_code)
        .map(|z| ZoneMatch {
            price_per_area: z.price_per_area,
            kind: ZoneMatchKind::PostalCode,
            zone: Some(z),
        })
}

fn by_city(city: &str) -> Option<ZoneMatch> {
    let wanted = city.to_lowercase();
    ZONES
        .iter()
        .find(|z| z.city.to_lowercase() == wanted)
        .map(|z| ZoneMatch {
            price_per_area: z.price_per_area,
            kind: ZoneMatchKind::City,
            zone: Some(z),
        })
}

fn by_province(postal_code: &str) -> Option<ZoneMatch> {
    let prefix = province_prefix(postal_code)?;
    ZONES
        .iter()
        .find(|z| province_prefix(z.postal_code) == Some(prefix))
        .map(|z| ZoneMatch {
            price_per_area: z.price_per_area * (1.0 - PROVINCE_MATCH_DISCOUNT),
            kind: ZoneMatchKind::Province,
            zone: Some(z),
        })
}

fn province_prefix(postal_code: &str) -> Option<&str> {
    postal_code.get(..3).filter(|p| p.len() == 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_postal_code_wins_over_city() {
        let m = lookup(Some("28014"), Some("Barcelona"));
        assert_eq!(m.kind, ZoneMatchKind::PostalCode);
        assert_eq!(m.price_per_area, 6_900.0);
        assert!(m.is_exact());
    }

    #[test]
    fn city_match_is_case_insensitive() {
        let m = lookup(Some("99999"), Some("  BARCELONA "));
        assert_eq!(m.kind, ZoneMatchKind::City);
        assert_eq!(m.zone.unwrap().city, "Barcelona");

        // Non-ASCII city names lowercase too.
        let m = lookup(None, Some("MÁLAGA"));
        assert_eq!(m.kind, ZoneMatchKind::City);
        assert_eq!(m.price_per_area, 3_900.0);
    }

    #[test]
    fn province_prefix_is_discounted() {
        // 28999 is not in the table but shares the Madrid prefix "289".
        let m = lookup(Some("28999"), None);
        assert_eq!(m.kind, ZoneMatchKind::Province);
        let expected = 2_500.0 * 0.85;
        assert!((m.price_per_area - expected).abs() < 1e-9);
    }

    #[test]
    fn postal_code_without_leading_zero_still_matches() {
        let m = lookup(Some("8008"), None);
        assert_eq!(m.kind, ZoneMatchKind::PostalCode);
        assert_eq!(m.price_per_area, 5_600.0);
    }

    #[test]
    fn falls_back_to_national_average() {
        assert_eq!(lookup(None, None).kind, ZoneMatchKind::National);
        assert_eq!(lookup(None, None).price_per_area, DEFAULTS.country_average);
        assert_eq!(lookup(Some(""), Some("   ")).kind, ZoneMatchKind::National);
        assert_eq!(lookup(Some("99"), Some("Atlantis")).kind, ZoneMatchKind::National);
    }

    #[test]
    fn lookup_is_idempotent() {
        let a = lookup(Some("46015"), Some("Valencia"));
        let b = lookup(Some("46015"), Some("Valencia"));
        assert_eq!(a, b);
    }

    #[test]
    fn table_keys_are_unique_five_digit_codes() {
        let mut seen = std::collections::HashSet::new();
        for z in ZONES {
            assert_eq!(z.postal_code.len(), 5, "{}", z.postal_code);
            assert!(z.postal_code.chars().all(|c| c.is_ascii_digit()));
            assert!(seen.insert(z.postal_code), "duplicate {}", z.postal_code);
            assert!(z.price_per_area > 0.0);
        }
    }
}
