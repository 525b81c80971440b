//! Cadastral registry data: tolerant normalization of registry responses
//! into one canonical record, multi-unit buildings, and the HTTP client
//! that fetches them.

pub mod catastro;
pub mod client;
pub mod error;
pub mod fields;
pub mod normalizer;
pub mod use_codes;

pub use client::{normalize_reference, CadastralClient, CadastralLookup};
pub use error::CadastralError;
pub use normalizer::{
    building_units, floor_label, is_multi_unit, normalize, select_unit, BuildingUnit,
    CadastralRecord,
};
pub use use_codes::{use_label, UnitIcon};
