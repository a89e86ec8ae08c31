use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings, read once at start-up
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub oidc_issuer_url: String,
    pub oidc_audience: Option<String>,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    /// Include store error text in 500 responses
    pub expose_error_details: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            oidc_issuer_url: required("OIDC_ISSUER_URL")?,
            oidc_audience: lookup("OIDC_AUDIENCE").filter(|value| !value.trim().is_empty()),
            bind_addr: parse_or(&lookup, "BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            run_migrations: flag_or(&lookup, "RUN_MIGRATIONS", true)?,
            expose_error_details: flag_or(&lookup, "EXPOSE_ERROR_DETAILS", false)?,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        None => Ok(default),
    }
}

fn flag_or(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: bool,
) -> Result<bool, ConfigError> {
    match lookup(name) {
        Some(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value }),
        },
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/obe"),
        ("OIDC_ISSUER_URL", "https://idp.example.edu/realms/college"),
    ];

    #[test]
    fn test_defaults() {
        let config = config(&REQUIRED).unwrap();
        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 10);
        assert!(config.run_migrations);
        assert!(!config.expose_error_details);
        assert_eq!(config.oidc_audience, None);
    }

    #[test]
    fn test_missing_required() {
        let err = config(&[("DATABASE_URL", "postgres://localhost/obe")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("OIDC_ISSUER_URL"));

        let err = config(&[("DATABASE_URL", " "), REQUIRED[1]]).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn test_overrides() {
        let mut vars = REQUIRED.to_vec();
        vars.extend([
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "4"),
            ("RUN_MIGRATIONS", "false"),
            ("EXPOSE_ERROR_DETAILS", "TRUE"),
            ("OIDC_AUDIENCE", "obe-backend"),
        ]);
        let config = config(&vars).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.db_max_connections, 4);
        assert!(!config.run_migrations);
        assert!(config.expose_error_details);
        assert_eq!(config.oidc_audience.as_deref(), Some("obe-backend"));
    }

    #[test]
    fn test_invalid_values() {
        let mut vars = REQUIRED.to_vec();
        vars.push(("DB_MAX_CONNECTIONS", "many"));
        assert!(matches!(
            config(&vars),
            Err(ConfigError::Invalid { name: "DB_MAX_CONNECTIONS", .. })
        ));

        let mut vars = REQUIRED.to_vec();
        vars.push(("RUN_MIGRATIONS", "maybe"));
        assert!(matches!(
            config(&vars),
            Err(ConfigError::Invalid { name: "RUN_MIGRATIONS", .. })
        ));
    }
}
