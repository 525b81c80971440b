//! Persisted valuation reports: the record sent to the lead, and the bits
//! needed to identify it.

pub mod format;
pub mod token;

use crate::domain::{PropertyAttributes, ValuationResult};
use crate::valuation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use token::{fingerprint, generate_report_id};

/// Body of a report submission.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReportRequest {
    pub attributes: PropertyAttributes,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationReport {
    pub id: String,
    pub fingerprint: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub attributes: PropertyAttributes,
    pub result: ValuationResult,
    pub created_at: DateTime<Utc>,
}

impl ValuationReport {
    /// Values the snapshot and stamps a fresh id.
    pub fn new(
        attributes: PropertyAttributes,
        email: Option<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            id: generate_report_id(),
            fingerprint: fingerprint(&attributes),
            email: clean(email).map(|e| e.to_lowercase()),
            name: clean(name),
            result: valuation::valuate(&attributes),
            attributes,
            created_at: Utc::now(),
        }
    }

    /// Short location line for subjects and spreadsheets.
    pub fn location(&self) -> String {
        let attrs = &self.attributes;
        match (attrs.postal_code.as_deref(), attrs.city.as_deref()) {
            (Some(cp), Some(city)) => format!("{cp} {city}"),
            (Some(cp), None) => cp.to_string(),
            (None, Some(city)) => city.to_string(),
            (None, None) => "Ubicación sin especificar".to_string(),
        }
    }
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Minimal shape check; delivery failures are reported by the mail API.
pub fn is_plausible_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
