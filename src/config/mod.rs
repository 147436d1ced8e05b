use dotenvy::dotenv;
use thiserror::Error;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} is missing from .env or environment")]
    Missing(&'static str),
    #[error("{0} is set but empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        dotenv().ok(); // .env is optional, plain env vars work too
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            match lookup(key) {
                None => Err(ConfigError::Missing(key)),
                Some(v) if v.trim().is_empty() => Err(ConfigError::Empty(key)),
                Some(v) => Ok(v.trim().to_string()),
            }
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Ok(Config {
            client_id: required("SPOTIFY_CLIENT_ID")?,
            client_secret: required("SPOTIFY_CLIENT_SECRET")?,
            redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
            gemini_api_key: required("GEMINI_API_KEY")?,
            gemini_model: optional("GEMINI_MODEL", DEFAULT_GEMINI_MODEL),
            gemini_base_url: optional("GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const FULL: &[(&str, &str)] = &[
        ("SPOTIFY_CLIENT_ID", "id"),
        ("SPOTIFY_CLIENT_SECRET", "secret"),
        ("SPOTIFY_REDIRECT_URI", "http://127.0.0.1:8989/callback"),
        ("GEMINI_API_KEY", "key"),
    ];

    #[test]
    fn test_loads_required_and_defaults() {
        let config = Config::from_lookup(lookup_from(FULL)).unwrap();
        assert_eq!(config.client_id, "id");
        assert_eq!(config.redirect_uri, "http://127.0.0.1:8989/callback");
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
    }

    #[test]
    fn test_missing_api_key_is_an_error() {
        let err = Config::from_lookup(lookup_from(&FULL[..3])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("GEMINI_API_KEY"));
    }

    #[test]
    fn test_blank_value_is_an_error() {
        let mut pairs = FULL.to_vec();
        pairs[1] = ("SPOTIFY_CLIENT_SECRET", "   ");
        let err = Config::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Empty("SPOTIFY_CLIENT_SECRET"));
    }

    #[test]
    fn test_model_override() {
        let mut pairs = FULL.to_vec();
        pairs.push(("GEMINI_MODEL", "gemini-2.0-flash"));
        let config = Config::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.gemini_model, "gemini-2.0-flash");
    }
}
