// src/cadastral/fields.rs

use serde_json::{Map, Value};

/// First key present with a non-null value.
pub fn field<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find(|v| !v.is_null())
}

/// First key holding a usable string. Numbers are accepted and stringified
/// since registries are inconsistent about codes like postal codes.
pub fn text(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(as_text)
}

pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Restores the leading zeros a postal code loses when sent as a JSON
/// number: `8008` is `"08008"`. Anything that is not 1-4 digits is kept.
pub fn pad_postal_code(raw: &str) -> String {
    let raw = raw.trim();
    if (1..5).contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_digit()) {
        format!("{raw:0>5}")
    } else {
        raw.to_string()
    }
}

/// First key holding a nested object.
pub fn object<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Map<String, Value>> {
    keys.iter()
        .filter_map(|k| obj.get(*k))
        .find_map(Value::as_object)
}

/// First key whose value parses as a number.
pub fn number(obj: &Map<String, Value>, keys: &[&str]) -> Option<f64> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(parse_number)
}

/// Numbers pass through; strings go through `parse_numeric_text`.
pub fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => parse_numeric_text(s),
        _ => None,
    }
}

/// Pulls the first numeric run out of free text: `"85,5 m²"` is 85.5,
/// `"1.234,50"` is 1234.5, `"approx. 90"` is 90.
pub fn parse_numeric_text(raw: &str) -> Option<f64> {
    let chars: Vec<char> = raw.chars().collect();
    let start = chars.iter().position(|c| c.is_ascii_digit())?;
    let negative = start > 0 && chars[start - 1] == '-';

    let run: String = chars[start..]
        .iter()
        .take_while(|c| c.is_ascii_digit() || **c == '.' || **c == ',')
        .collect();
    let run = run.trim_end_matches(['.', ',']);

    let dots = run.matches('.').count();
    let commas = run.matches(',').count();
    let normalized = if commas > 0 && dots > 0 {
        // Spanish grouping: dots group thousands, comma is the decimal mark.
        run.replace('.', "").replace(',', ".")
    } else if commas > 1 {
        run.replace(',', "")
    } else if dots > 1 {
        run.replace('.', "")
    } else {
        run.replace(',', ".")
    };

    let value: f64 = normalized.parse().ok()?;
    let value = if negative { -value } else { value };
    value.is_finite().then_some(value)
}

/// Integer reading of a numeric field; fractional parts are dropped.
pub fn integer(obj: &Map<String, Value>, keys: &[&str]) -> Option<i64> {
    number(obj, keys).map(|n| n.trunc() as i64)
}
