//! Process configuration read from the environment.

use std::net::SocketAddr;

use thiserror::Error;

use catalog_observability::{LogFormat, TracingConfig};
use catalog_products::DEFAULT_PAGE_SIZE;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be set when USE_PERSISTENT_STORES=true")]
    Missing { var: &'static str },

    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Where items and associations are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    InMemory,
    Postgres {
        database_url: String,
        max_connections: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub store: StoreBackend,
    /// Page size for list endpoints called without `size`.
    pub default_page_size: u32,
    pub log_format: LogFormat,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            store: StoreBackend::InMemory,
            default_page_size: DEFAULT_PAGE_SIZE,
            log_format: LogFormat::Json,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default        |
    /// |-------------------------|----------------|
    /// | `BIND_ADDR`             | `0.0.0.0:8080` |
    /// | `USE_PERSISTENT_STORES` | `false`        |
    /// | `DATABASE_URL`          | required when persistent |
    /// | `DB_MAX_CONNECTIONS`    | `5`            |
    /// | `DEFAULT_PAGE_SIZE`     | `10`           |
    /// | `LOG_FORMAT`            | `json`         |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Same as [`ApiConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let bind_addr = parse_var(&lookup, "BIND_ADDR", defaults.bind_addr)?;
        let default_page_size: u32 =
            parse_var(&lookup, "DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        if default_page_size == 0 {
            return Err(ConfigError::Invalid {
                var: "DEFAULT_PAGE_SIZE",
                value: "0".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }

        let log_format = match lookup("LOG_FORMAT") {
            None => defaults.log_format,
            Some(raw) => LogFormat::parse(&raw).ok_or_else(|| ConfigError::Invalid {
                var: "LOG_FORMAT",
                value: raw.clone(),
                reason: "expected `json` or `pretty`".to_string(),
            })?,
        };

        let store = if parse_var(&lookup, "USE_PERSISTENT_STORES", false)? {
            let database_url = lookup("DATABASE_URL")
                .filter(|url| !url.trim().is_empty())
                .ok_or(ConfigError::Missing {
                    var: "DATABASE_URL",
                })?;
            StoreBackend::Postgres {
                database_url,
                max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", 5u32)?,
            }
        } else {
            StoreBackend::InMemory
        };

        Ok(Self {
            bind_addr,
            store,
            default_page_size,
            log_format,
        })
    }

    pub fn tracing(&self) -> TracingConfig {
        TracingConfig {
            format: self.log_format,
            ..TracingConfig::default()
        }
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|k| vars.get(k).cloned())
    }

    #[test]
    fn defaults_to_in_memory_on_8080() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg, ApiConfig::default());
        assert_eq!(cfg.bind_addr.port(), 8080);
        assert_eq!(cfg.default_page_size, 10);
    }

    #[test]
    fn persistent_stores_need_a_database_url() {
        let err = config(&[("USE_PERSISTENT_STORES", "true")]).unwrap_err();
        assert_eq!(err, ConfigError::Missing { var: "DATABASE_URL" });

        let cfg = config(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/catalog"),
            ("DB_MAX_CONNECTIONS", "12"),
        ])
        .unwrap();
        assert_eq!(
            cfg.store,
            StoreBackend::Postgres {
                database_url: "postgres://localhost/catalog".to_string(),
                max_connections: 12,
            }
        );
    }

    #[test]
    fn malformed_values_are_reported_by_name() {
        let err = config(&[("BIND_ADDR", "nowhere")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "BIND_ADDR", .. }));

        let err = config(&[("DEFAULT_PAGE_SIZE", "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "DEFAULT_PAGE_SIZE", .. }));

        let err = config(&[("LOG_FORMAT", "xml")]).unwrap_err();
        assert!(err.to_string().contains("LOG_FORMAT"));
    }
}
