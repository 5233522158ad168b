use thiserror::Error;
use url::Url;

use crate::share::meta::Site;

pub const BASE_URL_VAR: &str = "CREW_QUIZ_BASE_URL";
pub const DB_PATH_VAR: &str = "CREW_QUIZ_DB_PATH";

const DEFAULT_BASE_URL: &str = "https://crew.mecuerdo.example/";
const DEFAULT_DB_PATH: &str = "db.sqlite";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL with a host, got {value:?}")]
    InvalidBaseUrl { var: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}

/// Runtime settings. The bot token itself is read by teloxide from
/// `TELOXIDE_TOKEN`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub site: Site,
    pub db_path: String,
}

impl Config {
    /// Loads `.env` when present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(err) = dotenv::dotenv() {
            log::debug!("No .env file loaded: {}", err);
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = base_url.trim().to_string();
        let origin = origin_of(&base_url).ok_or_else(|| ConfigError::InvalidBaseUrl {
            var: BASE_URL_VAR,
            value: base_url.clone(),
        })?;

        let db_path = lookup(DB_PATH_VAR).unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        if db_path.trim().is_empty() {
            return Err(ConfigError::Empty(DB_PATH_VAR));
        }

        Ok(Self {
            site: Site { base_url, origin },
            db_path,
        })
    }
}

/// `https://host:8080/quiz/` -> `https://host:8080`
fn origin_of(base_url: &str) -> Option<String> {
    let url = Url::parse(base_url).ok()?;
    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return None;
    }
    Some(url.origin().ascii_serialization())
}
