use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::info;

use rsvp_api::Security;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:8080,http://localhost:5173";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Browser origins allowed by CORS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// `*`: any origin, served without credentials.
    Any,
    List(Vec<String>),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    pub cors_origins: CorsOrigins,
    pub security: Security,
    /// POSTs allowed per client per window; 0 disables limiting.
    pub rate_limit: u32,
    pub rate_window: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("RSVP_PORT") {
            Some(v) => parse("RSVP_PORT", v)?,
            None => parse("PORT", var("PORT").unwrap_or_else(|| "3001".into()))?,
        };

        let api_key = var("API_KEY");
        if api_key.is_none() {
            info!("API_KEY not set; gated routes will answer 500 until it is configured");
        }

        Ok(Self {
            host: var("RSVP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            db_path: var("DB_PATH").unwrap_or_else(|| "wedding.db".into()).into(),
            cors_origins: parse_origins(
                var("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGINS.into()),
            )?,
            security: Security {
                api_key,
                protect_writes: parse_bool(
                    "RSVP_PROTECT_WRITES",
                    var("RSVP_PROTECT_WRITES"),
                    true,
                )?,
                protect_reads: parse_bool("RSVP_PROTECT_READS", var("RSVP_PROTECT_READS"), false)?,
            },
            rate_limit: parse(
                "RSVP_RATE_LIMIT",
                var("RSVP_RATE_LIMIT").unwrap_or_else(|| "10".into()),
            )?,
            rate_window: Duration::from_secs(parse(
                "RSVP_RATE_WINDOW_SECS",
                var("RSVP_RATE_WINDOW_SECS").unwrap_or_else(|| "900".into()),
            )?),
        })
    }
}

fn parse<T>(key: &'static str, value: String) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        reason: e.to_string(),
        value,
    })
}

fn parse_origins(value: String) -> Result<CorsOrigins, ConfigError> {
    let origins: Vec<String> = value
        .split(',')
        .map(|o| o.trim().to_string())
        .filter(|o| !o.is_empty())
        .collect();

    if !origins.iter().any(|o| o == "*") {
        return Ok(CorsOrigins::List(origins));
    }
    if origins.len() == 1 {
        return Ok(CorsOrigins::Any);
    }
    Err(ConfigError::Invalid {
        key: "CORS_ORIGIN",
        value,
        reason: "`*` cannot be combined with other origins".into(),
    })
}

fn parse_bool(
    key: &'static str,
    value: Option<String>,
    default: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key,
            value,
            reason: "expected true or false".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3001);
        assert_eq!(config.db_path, PathBuf::from("wedding.db"));
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec![
                "http://localhost:8080".into(),
                "http://localhost:5173".into(),
            ])
        );
        assert_eq!(config.security.api_key, None);
        assert!(config.security.protect_writes);
        assert!(!config.security.protect_reads);
        assert_eq!(config.rate_limit, 10);
        assert_eq!(config.rate_window, Duration::from_secs(900));
    }

    #[test]
    fn rsvp_port_wins_over_port() {
        assert_eq!(load(&[("PORT", "8080")]).unwrap().port, 8080);
        assert_eq!(load(&[("PORT", "8080"), ("RSVP_PORT", "9090")]).unwrap().port, 9090);
    }

    #[test]
    fn blank_api_key_is_unset() {
        assert_eq!(load(&[("API_KEY", "  ")]).unwrap().security.api_key, None);
        assert_eq!(
            load(&[("API_KEY", "hunter2")]).unwrap().security.api_key.as_deref(),
            Some("hunter2")
        );
    }

    #[test]
    fn parses_flags_and_origins() {
        let config = load(&[
            ("RSVP_PROTECT_READS", "yes"),
            ("RSVP_PROTECT_WRITES", "off"),
            ("CORS_ORIGIN", "https://wedding.example, https://admin.example"),
        ])
        .unwrap();
        assert!(config.security.protect_reads);
        assert!(!config.security.protect_writes);
        assert_eq!(
            config.cors_origins,
            CorsOrigins::List(vec![
                "https://wedding.example".into(),
                "https://admin.example".into(),
            ])
        );
    }

    #[test]
    fn wildcard_origin_means_any() {
        assert_eq!(load(&[("CORS_ORIGIN", " * ")]).unwrap().cors_origins, CorsOrigins::Any);
        assert!(load(&[("CORS_ORIGIN", "*,https://wedding.example")]).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(load(&[("PORT", "eighty")]).is_err());
        assert!(load(&[("RSVP_PROTECT_READS", "maybe")]).is_err());
        assert!(load(&[("RSVP_RATE_LIMIT", "-1")]).is_err());
    }
}
