// src/cadastral/catastro.rs
//! Unwraps the Catastro `Consulta_DNPRC` JSON envelope into the field names
//! the normalizer reads. Other response shapes pass through untouched.

use crate::cadastral::fields::as_text;
use serde_json::{json, Map, Value};
use std::borrow::Cow;

const RESULT_KEY: &str = "consulta_dnprcResult";

pub fn unwrap_envelope(response: &Value) -> Cow<'_, Value> {
    match response.get(RESULT_KEY) {
        Some(result) => Cow::Owned(flatten_result(result)),
        None => Cow::Borrowed(response),
    }
}

/// `bico.bi` is a single property; `lrcdnp.rcdnp` lists the units of a
/// building. An error-only result flattens to an empty object.
fn flatten_result(result: &Value) -> Value {
    if let Some(bi) = result.pointer("/bico/bi") {
        return Value::Object(flatten_property(bi));
    }

    let units: Vec<Value> = match result.pointer("/lrcdnp/rcdnp") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|u| Value::Object(flatten_property(u)))
            .collect(),
        Some(item @ Value::Object(_)) => vec![Value::Object(flatten_property(item))],
        _ => Vec::new(),
    };

    if units.is_empty() {
        Value::Object(Map::new())
    } else {
        json!({ "inmuebles": units })
    }
}

fn flatten_property(entry: &Value) -> Map<String, Value> {
    let mut out = Map::new();
    let dt = entry.get("dt");
    let urban = dt.and_then(|d| d.pointer("/locs/lous/lourb"));

    copy(&mut out, "rc", entry.pointer("/idbi/rc").or_else(|| entry.get("rc")));

    let mut address = Map::new();
    let line = entry
        .get("ldt")
        .filter(|v| v.is_string())
        .cloned()
        .or_else(|| street_line(urban));
    copy(&mut address, "valor", line.as_ref());
    copy(&mut address, "codigoPostal", urban.and_then(|u| u.get("dp")));
    copy(&mut address, "municipio", dt.and_then(|d| d.get("nm")));
    copy(&mut address, "provincia", dt.and_then(|d| d.get("np")));
    if !address.is_empty() {
        out.insert("direccion".into(), Value::Object(address));
    }

    copy(&mut out, "planta", urban.and_then(|u| u.pointer("/loint/pt")));
    copy(&mut out, "puerta", urban.and_then(|u| u.pointer("/loint/pu")));
    copy(&mut out, "datosEconomicos", entry.get("debi"));
    out
}

fn copy(out: &mut Map<String, Value>, key: &str, value: Option<&Value>) {
    if let Some(v) = value.filter(|v| !v.is_null()) {
        out.insert(key.to_string(), v.clone());
    }
}

/// `"CL MAYOR 1"` from street type, name and number.
fn street_line(urban: Option<&Value>) -> Option<Value> {
    let dir = urban?.get("dir")?;
    let parts: Vec<String> = ["tv", "nv", "pnp"]
        .iter()
        .filter_map(|k| dir.get(*k))
        .filter_map(as_text)
        .collect();
    (!parts.is_empty()).then(|| Value::String(parts.join(" ")))
}
