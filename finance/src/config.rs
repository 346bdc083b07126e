// Configuration du serveur (variables d'environnement / .env)

use rust_decimal::Decimal;
use std::env;
use thiserror::Error;

const INSECURE_SESSION_SECRET: &str = "default-insecure-key-change-this";
// Un an au plus
const MAX_SESSION_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Paramètres lus au démarrage puis injectés dans les handlers via `web::Data`
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub bind_address: String,
    pub port: u16,
    pub quote_api_url: String,
    pub quote_api_key: String,
    pub session_secret: String,
    pub session_ttl_hours: i64,
    pub starting_cash: Decimal,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construit les paramètres à partir d'une fonction de lecture
    /// (l'environnement en production, une map dans les tests)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Pas de démarrage sans clé d'API de cotation
        let quote_api_key = lookup("API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("API_KEY"))?;

        let session_secret = match lookup("SESSION_SECRET") {
            Some(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("SESSION_SECRET not set, using default (INSECURE)");
                INSECURE_SESSION_SECRET.to_string()
            }
        };

        let session_ttl_hours: i64 = parse_or(&lookup, "SESSION_TTL_HOURS", 24)?;
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&session_ttl_hours) {
            return Err(ConfigError::Invalid {
                key: "SESSION_TTL_HOURS",
                value: session_ttl_hours.to_string(),
            });
        }

        Ok(Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://finance.db?mode=rwc".to_string()),
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            quote_api_url: lookup("QUOTE_API_URL")
                .unwrap_or_else(|| "https://cloud.iexapis.com/stable".to_string()),
            quote_api_key,
            session_secret,
            session_ttl_hours,
            starting_cash: parse_or(&lookup, "STARTING_CASH", Decimal::new(10_000, 0))?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
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

    #[test]
    fn test_defaults_when_only_api_key_is_set() {
        let settings = Settings::from_lookup(lookup_from(&[("API_KEY", "pk_test")])).unwrap();

        assert_eq!(settings.database_url, "sqlite://finance.db?mode=rwc");
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.session_ttl_hours, 24);
        assert_eq!(settings.starting_cash, Decimal::new(10_000, 0));
        assert_eq!(settings.session_secret, INSECURE_SESSION_SECRET);
    }

    #[test]
    fn test_missing_api_key() {
        let result = Settings::from_lookup(lookup_from(&[]));
        assert_eq!(result.unwrap_err(), ConfigError::Missing("API_KEY"));
    }

    #[test]
    fn test_invalid_port() {
        let result = Settings::from_lookup(lookup_from(&[("API_KEY", "k"), ("PORT", "http")]));
        assert_eq!(
            result.unwrap_err(),
            ConfigError::Invalid { key: "PORT", value: "http".to_string() }
        );
    }

    #[test]
    fn test_session_ttl_bounds() {
        for raw in ["0", "-5", "9223372036854775807"] {
            let result = Settings::from_lookup(lookup_from(&[("API_KEY", "k"), ("SESSION_TTL_HOURS", raw)]));
            assert_eq!(
                result.unwrap_err(),
                ConfigError::Invalid { key: "SESSION_TTL_HOURS", value: raw.to_string() }
            );
        }

        let settings =
            Settings::from_lookup(lookup_from(&[("API_KEY", "k"), ("SESSION_TTL_HOURS", "8760")])).unwrap();
        assert_eq!(settings.session_ttl_hours, 8760);
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("API_KEY", "k"),
            ("PORT", "9000"),
            ("STARTING_CASH", "2500.50"),
            ("SESSION_SECRET", "s3cret"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 9000);
        assert_eq!(settings.starting_cash, Decimal::new(250_050, 2));
        assert_eq!(settings.session_secret, "s3cret");
    }
}
