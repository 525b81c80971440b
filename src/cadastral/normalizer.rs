// src/cadastral/normalizer.rs

use crate::cadastral::catastro::unwrap_envelope;
use crate::cadastral::fields::{self, as_text};
use crate::cadastral::use_codes::{use_label, UnitIcon};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_SURFACE: f64 = 100.0;
pub const DEFAULT_CONSTRUCTION_YEAR: i32 = 2000;
pub const MULTI_UNIT_BUILDING: &str = "Plurifamiliar";
pub const SINGLE_UNIT_BUILDING: &str = "Unifamiliar";

// Registry responses use several spellings for the same thing. Each list is
// checked in order; the first usable value wins.
const UNIT_LIST_KEYS: &[&str] = &["inmuebles", "bienesInmuebles", "unidades", "units"];
const REFERENCE_KEYS: &[&str] = &[
    "referenciaCatastral",
    "refCatastral",
    "referencia",
    "rc",
    "cadastralReference",
];
/// Concatenation order of a structured reference.
const REFERENCE_PARTS: &[&str] = &["pc1", "pc2", "car", "cc1", "cc2"];
const ADDRESS_KEYS: &[&str] = &["direccion", "domicilio", "address"];
const ADDRESS_VALUE_KEYS: &[&str] = &["valor", "value"];
const ADDRESS_FALLBACK_KEYS: &[&str] = &["descripcion", "texto", "ldt"];
const ECONOMIC_KEYS: &[&str] = &["datosEconomicos", "datos_economicos", "economicData"];
const POSTAL_CODE_KEYS: &[&str] = &["codigoPostal", "codPostal", "cp", "dp", "postalCode"];
const MUNICIPALITY_KEYS: &[&str] = &["municipio", "nm", "localidad", "municipality"];
const PROVINCE_KEYS: &[&str] = &["provincia", "np", "province"];
const USE_KEYS: &[&str] = &["uso", "codigoUso", "luso", "useCode", "use"];
const SURFACE_KEYS: &[&str] = &["superficieConstruida", "superficie", "sfc", "surface"];
const YEAR_KEYS: &[&str] = &[
    "añoConstruccion",
    "anoConstruccion",
    "anyoConstruccion",
    "ant",
    "constructionYear",
];
const BUILDING_TYPE_KEYS: &[&str] = &["tipoFinca", "tipoEdificio", "buildingType"];
const UNIT_COUNT_KEYS: &[&str] = &["numeroInmuebles", "totalInmuebles", "unitCount"];
const FLOORS_KEYS: &[&str] = &["numeroPlantas", "plantas", "floors"];
const COORDINATE_KEYS: &[&str] = &["coordenadas", "coordinates", "geo"];
const LATITUDE_KEYS: &[&str] = &["latitud", "lat", "latitude"];
const LONGITUDE_KEYS: &[&str] = &["longitud", "lon", "lng", "longitude"];
const FLOOR_KEYS: &[&str] = &["planta", "pt", "floor"];
const DOOR_KEYS: &[&str] = &["puerta", "pu", "door"];

/// Canonical property data reconciled from one registry response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CadastralRecord {
    pub cadastral_reference: String,
    pub address: String,
    pub postal_code: String,
    pub municipality: String,
    pub province: String,
    pub property_type: String,
    pub building_type: String,
    pub surface: f64,
    pub construction_year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floors: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
}

impl CadastralRecord {
    /// Stand-in used when the registry cannot be reached: the reference the
    /// user typed plus the normalizer's defaults.
    pub fn placeholder(reference: &str) -> Self {
        Self {
            cadastral_reference: reference.trim().to_uppercase(),
            address: String::new(),
            postal_code: String::new(),
            municipality: String::new(),
            province: String::new(),
            property_type: use_label(""),
            building_type: SINGLE_UNIT_BUILDING.to_string(),
            surface: DEFAULT_SURFACE,
            construction_year: DEFAULT_CONSTRUCTION_YEAR,
            floors: None,
            latitude: None,
            longitude: None,
        }
    }
}

/// One registrable unit of a building, as offered to the unit picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingUnit {
    pub cadastral_reference: String,
    pub floor: String,
    pub door: String,
    pub surface: f64,
    pub use_code: String,
    pub construction_year: i32,
    pub icon: UnitIcon,
}

/// Normalizes a registry response into one record.
///
/// Multi-unit responses resolve to their first unit. Returns `None` only
/// when there is nothing to normalize (null, empty object, empty list).
pub fn normalize(response: &Value) -> Option<CadastralRecord> {
    let response = unwrap_envelope(response);
    let response = Response::parse(&response)?;
    Some(response.record(response.units.first().copied()))
}

/// All units listed in the response, for the picker. Empty when the
/// response does not carry a unit list.
pub fn building_units(response: &Value) -> Vec<BuildingUnit> {
    let response = unwrap_envelope(response);
    let Some(response) = Response::parse(&response) else {
        return Vec::new();
    };
    response
        .units
        .iter()
        .map(|unit| response.unit(*unit))
        .collect()
}

/// The record for the unit at `index`, in the same shape `normalize` returns.
pub fn select_unit(response: &Value, index: usize) -> Option<CadastralRecord> {
    let response = unwrap_envelope(response);
    let response = Response::parse(&response)?;
    let unit = response.units.get(index).copied()?;
    Some(response.record(Some(unit)))
}

/// True when the response lists more than one registrable unit.
pub fn is_multi_unit(response: &Value) -> bool {
    Response::parse(&unwrap_envelope(response)).is_some_and(|r| r.unit_count() > 1)
}

/// Floor label for the picker: `"3º"` for numbered floors, `"Bajo"` for the
/// ground floor or anything that isn't a number.
pub fn floor_label(raw: &str) -> String {
    match raw.trim().parse::<i32>() {
        Ok(n) if n != 0 => format!("{n}º"),
        _ => "Bajo".to_string(),
    }
}

struct Response<'a> {
    building: &'a Map<String, Value>,
    units: Vec<&'a Map<String, Value>>,
}

impl<'a> Response<'a> {
    fn parse(value: &'a Value) -> Option<Self> {
        static EMPTY: std::sync::OnceLock<Map<String, Value>> = std::sync::OnceLock::new();

        match value {
            Value::Object(map) if !map.is_empty() => {
                let units = fields::field(map, UNIT_LIST_KEYS)
                    .and_then(Value::as_array)
                    .map(|items| items.iter().filter_map(Value::as_object).collect())
                    .unwrap_or_default();
                Some(Self {
                    building: map,
                    units,
                })
            }
            // A bare unit listing carries no building-level context.
            Value::Array(items) => {
                let units: Vec<_> = items.iter().filter_map(Value::as_object).collect();
                if units.is_empty() {
                    return None;
                }
                Some(Self {
                    building: EMPTY.get_or_init(Map::new),
                    units,
                })
            }
            _ => None,
        }
    }

    fn unit_count(&self) -> usize {
        let declared = fields::integer(self.building, UNIT_COUNT_KEYS)
            .filter(|n| *n > 0)
            .map(|n| n as usize)
            .unwrap_or(0);
        declared.max(self.units.len())
    }

    fn record(&self, unit: Option<&'a Map<String, Value>>) -> CadastralRecord {
        let scope = Scope::new(unit, self.building);

        let building_type = fields::text(self.building, BUILDING_TYPE_KEYS).unwrap_or_else(|| {
            if self.unit_count() > 1 {
                MULTI_UNIT_BUILDING.to_string()
            } else {
                SINGLE_UNIT_BUILDING.to_string()
            }
        });

        let (latitude, longitude) = scope.coordinates();

        CadastralRecord {
            cadastral_reference: scope.reference(),
            address: scope.address(),
            postal_code: fields::pad_postal_code(&scope.located(POSTAL_CODE_KEYS)),
            municipality: scope.located(MUNICIPALITY_KEYS),
            province: scope.located(PROVINCE_KEYS),
            property_type: use_label(&scope.use_code()),
            building_type,
            surface: scope.surface(),
            construction_year: scope.construction_year(),
            floors: scope
                .first(|m| fields::integer(m, FLOORS_KEYS))
                .filter(|n| *n > 0)
                .map(|n| n as u32),
            latitude,
            longitude,
        }
    }

    fn unit(&self, unit: &'a Map<String, Value>) -> BuildingUnit {
        let scope = Scope::new(Some(unit), self.building);
        let use_code = scope.use_code();

        BuildingUnit {
            cadastral_reference: scope.reference(),
            floor: floor_label(&fields::text(unit, FLOOR_KEYS).unwrap_or_default()),
            door: fields::text(unit, DOOR_KEYS).unwrap_or_default(),
            surface: scope.surface(),
            icon: UnitIcon::for_use_code(&use_code),
            use_code,
            construction_year: scope.construction_year(),
        }
    }
}

/// Field resolution over a unit and its building, unit first.
struct Scope<'a> {
    layers: Vec<&'a Map<String, Value>>,
}

impl<'a> Scope<'a> {
    fn new(unit: Option<&'a Map<String, Value>>, building: &'a Map<String, Value>) -> Self {
        let mut layers = Vec::with_capacity(2);
        layers.extend(unit);
        layers.push(building);
        Self { layers }
    }

    fn first<T>(&self, f: impl Fn(&'a Map<String, Value>) -> Option<T>) -> Option<T> {
        self.layers.iter().find_map(|m| f(*m))
    }

    /// Per layer: the economic-data block, then the layer's top level.
    fn economic<T>(&self, f: impl Fn(&'a Map<String, Value>) -> Option<T>) -> Option<T> {
        self.first(|m| {
            fields::object(m, ECONOMIC_KEYS)
                .and_then(&f)
                .or_else(|| f(m))
        })
    }

    fn reference(&self) -> String {
        let candidates =
            |m: &'a Map<String, Value>| REFERENCE_KEYS.iter().filter_map(move |k| m.get(*k));

        let flat = self.first(|m| {
            candidates(m)
                .filter_map(Value::as_str)
                .map(|s| s.split_whitespace().collect::<String>())
                .find(|s| !s.is_empty())
        });
        flat.or_else(|| {
            self.first(|m| {
                candidates(m)
                    .filter_map(Value::as_object)
                    .find_map(join_reference_parts)
            })
        })
        .unwrap_or_default()
    }

    fn address(&self) -> String {
        self.first(|m| match fields::field(m, ADDRESS_KEYS)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Object(obj) => fields::text(obj, ADDRESS_VALUE_KEYS)
                .or_else(|| fields::text(obj, ADDRESS_FALLBACK_KEYS)),
            _ => None,
        })
        .unwrap_or_default()
    }

    /// Per layer: the address object first, then top-level aliases.
    fn located(&self, keys: &[&str]) -> String {
        self.first(|m| {
            fields::object(m, ADDRESS_KEYS)
                .and_then(|a| fields::text(a, keys))
                .or_else(|| fields::text(m, keys))
        })
        .unwrap_or_default()
    }

    fn use_code(&self) -> String {
        self.economic(|m| fields::text(m, USE_KEYS))
            .unwrap_or_default()
    }

    fn surface(&self) -> f64 {
        self.economic(|m| fields::number(m, SURFACE_KEYS))
            .filter(|s| *s > 0.0)
            .unwrap_or(DEFAULT_SURFACE)
    }

    fn construction_year(&self) -> i32 {
        self.economic(|m| fields::integer(m, YEAR_KEYS))
            .filter(|y| *y > 0 && *y <= i32::MAX as i64)
            .map(|y| y as i32)
            .unwrap_or(DEFAULT_CONSTRUCTION_YEAR)
    }

    fn coordinates(&self) -> (Option<f64>, Option<f64>) {
        let read = |m: &Map<String, Value>| {
            let lat = fields::number(m, LATITUDE_KEYS)?;
            let lon = fields::number(m, LONGITUDE_KEYS)?;
            Some((lat, lon))
        };
        self.first(|m| fields::object(m, COORDINATE_KEYS).and_then(read).or_else(|| read(m)))
            .map(|(lat, lon)| (Some(lat), Some(lon)))
            .unwrap_or((None, None))
    }
}

fn join_reference_parts(parts: &Map<String, Value>) -> Option<String> {
    let joined: String = REFERENCE_PARTS
        .iter()
        .filter_map(|k| parts.get(*k).and_then(as_text))
        .collect();
    (!joined.is_empty()).then_some(joined)
}
