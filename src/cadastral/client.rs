// src/cadastral/client.rs
use crate::cadastral::error::CadastralError;
use crate::cadastral::normalizer::{building_units, is_multi_unit, normalize};
use crate::cadastral::{BuildingUnit, CadastralRecord};
use crate::config::CatastroConfig;
use rand::Rng;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

const USER_AGENT: &str = concat!("tasador/", env!("CARGO_PKG_VERSION"));
const MAX_BACKOFF_SECS: u64 = 4;
const JITTER_MAX_MILLIS: u64 = 500;

/// Outcome of resolving a reference against the registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CadastralLookup {
    Single(CadastralRecord),
    MultiUnit(Vec<BuildingUnit>),
}

pub struct CadastralClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
    max_attempts: u32,
}

impl CadastralClient {
    pub fn new(config: &CatastroConfig) -> Result<Self, CadastralError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| CadastralError::Config(format!("bad registry URL: {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| CadastralError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key.clone(),
            max_attempts: config.max_attempts.max(1),
        })
    }

    /// Resolves a reference for the wizard. Registry failures fall back to a
    /// placeholder record; only a malformed reference is an error.
    pub fn resolve(&self, reference: &str) -> Result<CadastralLookup, CadastralError> {
        let reference = normalize_reference(reference)?;

        let response = match self.lookup(&reference) {
            Ok(response) => response,
            Err(e) => {
                warn!(%reference, error = %e, "registry lookup failed, using placeholder");
                return Ok(CadastralLookup::Single(CadastralRecord::placeholder(&reference)));
            }
        };

        if is_multi_unit(&response) {
            let units = building_units(&response);
            if !units.is_empty() {
                return Ok(CadastralLookup::MultiUnit(units));
            }
        }

        match normalize(&response) {
            Some(mut record) => {
                // An empty reference falls back to the one requested.
                if record.cadastral_reference.is_empty() {
                    record.cadastral_reference = reference;
                }
                Ok(CadastralLookup::Single(record))
            }
            None => {
                warn!(%reference, "registry returned an empty response, using placeholder");
                Ok(CadastralLookup::Single(CadastralRecord::placeholder(&reference)))
            }
        }
    }

    /// Raw registry response for a reference, retried on transient failure.
    pub fn lookup(&self, reference: &str) -> Result<Value, CadastralError> {
        let reference = normalize_reference(reference)?;
        let url = self.lookup_url(&reference);

        let mut last_err = None;
        for attempt in 1..=self.max_attempts {
            match self.try_lookup(&url) {
                Ok(value) => {
                    info!(%reference, attempt, "registry lookup succeeded");
                    return Ok(value);
                }
                Err(e) if e.is_retryable() && attempt < self.max_attempts => {
                    warn!(%reference, attempt, error = %e, "registry lookup failed, retrying");
                    last_err = Some(e);

                    let base = std::cmp::min(u64::from(attempt), MAX_BACKOFF_SECS);
                    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MILLIS);
                    std::thread::sleep(Duration::from_secs(base) + Duration::from_millis(jitter));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| CadastralError::Network("retry loop exhausted".into())))
    }

    fn lookup_url(&self, reference: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut().append_pair("refcat", reference);
        url
    }

    fn try_lookup(&self, url: &Url) -> Result<Value, CadastralError> {
        let mut request = self.client.get(url.clone());
        if let Some(key) = &self.api_key {
            request = request.header("api-key", key);
        }

        let resp = request
            .send()
            .map_err(|e| CadastralError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| CadastralError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(CadastralError::Status(status.as_u16(), truncate(&text, 200)));
        }

        serde_json::from_str(&text).map_err(|e| CadastralError::JsonParse(e.to_string()))
    }
}

/// Strips whitespace and uppercases. Accepts 14-character parcel references
/// and 20-character unit references.
pub fn normalize_reference(raw: &str) -> Result<String, CadastralError> {
    let reference: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();

    let valid_length = reference.len() == 14 || reference.len() == 20;
    if !valid_length || !reference.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(CadastralError::InvalidReference(raw.trim().to_string()));
    }
    Ok(reference)
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
