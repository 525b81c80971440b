// src/config.rs
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CATASTRO_URL: &str =
    "https://ovc.catastro.meh.es/OVCServWeb/OVCWcfCallejero/COVCCallejero.svc/json/Consulta_DNPRC";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub db_path: String,
    pub workers: usize,
    pub catastro: CatastroConfig,
    pub mail: Option<MailConfig>,
    pub log_level: String,
    pub log_format: String,
    /// Problems found while reading the keys. Logged once logging is up.
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CatastroConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub max_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_key: String,
    pub sender_email: String,
    pub sender_name: String,
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a local `.env`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup. Every key has a default.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mail = get("BREVO_API_KEY").map(|api_key| MailConfig {
            api_key,
            sender_email: get("MAIL_SENDER_EMAIL")
                .unwrap_or_else(|| "tasaciones@tasador.es".into()),
            sender_name: get("MAIL_SENDER_NAME").unwrap_or_else(|| "Tasador".into()),
        });

        let mut warnings = Vec::new();
        let workers = parse_or(&get, "TASADOR_WORKERS", 8, &mut warnings);
        let timeout_secs = parse_or(&get, "CATASTRO_TIMEOUT_SECS", 15, &mut warnings);
        let max_attempts = parse_or::<u32, _>(&get, "CATASTRO_MAX_ATTEMPTS", 2, &mut warnings);

        Self {
            bind_addr: get("TASADOR_BIND").unwrap_or_else(|| "127.0.0.1:3000".into()),
            db_path: get("TASADOR_DB_PATH").unwrap_or_else(|| "tasador.sqlite3".into()),
            workers,
            catastro: CatastroConfig {
                base_url: get("CATASTRO_BASE_URL").unwrap_or_else(|| DEFAULT_CATASTRO_URL.into()),
                api_key: get("CATASTRO_API_KEY"),
                timeout: Duration::from_secs(timeout_secs),
                max_attempts: max_attempts.max(1),
            },
            mail,
            log_level: get("LOG_LEVEL").unwrap_or_else(|| "info".into()),
            log_format: get("LOG_FORMAT").unwrap_or_else(|| "pretty".into()),
            warnings,
        }
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T, warnings: &mut Vec<String>) -> T
where
    T: FromStr + Copy + std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => default,
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warnings.push(format!("{key}={raw:?} is not valid, using {default}"));
            default
        }),
    }
}
