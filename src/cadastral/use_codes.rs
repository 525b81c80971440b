// src/cadastral/use_codes.rs

use serde::{Deserialize, Serialize};

/// Label used when the registry reports no land use at all.
pub const DEFAULT_USE_LABEL: &str = "Residencial";

// Registry land-use keys ("clave de uso").
const USE_LABELS: &[(&str, &str)] = &[
    ("V", "Residencial"),
    ("I", "Industrial"),
    ("O", "Oficinas"),
    ("C", "Comercial"),
    ("K", "Deportivo"),
    ("T", "Espectáculos"),
    ("Y", "Sanidad y Beneficencia"),
    ("E", "Cultural"),
    ("R", "Religioso"),
    ("M", "Obras de urbanización y jardinería"),
    ("P", "Edificio singular"),
    ("A", "Almacén-Estacionamiento"),
    ("B", "Almacén agrario"),
    ("J", "Industrial agrario"),
    ("Z", "Agrario"),
];

/// Human label for a land-use code. Unknown codes pass through unchanged.
pub fn use_label(code: &str) -> String {
    let code = code.trim();
    if code.is_empty() {
        return DEFAULT_USE_LABEL.to_string();
    }
    let upper = code.to_uppercase();
    USE_LABELS
        .iter()
        .find(|(k, _)| *k == upper)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Picker icon for a unit in a multi-unit building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitIcon {
    Home,
    Parking,
    Storage,
    Shop,
    Office,
    Industry,
    Building,
}

impl UnitIcon {
    pub fn for_use_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "" | "V" => UnitIcon::Home,
            "A" => UnitIcon::Parking,
            "B" => UnitIcon::Storage,
            "C" => UnitIcon::Shop,
            "O" => UnitIcon::Office,
            "I" | "J" => UnitIcon::Industry,
            _ => UnitIcon::Building,
        }
    }
}
