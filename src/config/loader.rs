//! Load [`AppConfig`] from environment variables.

use crate::config::types::*;
use crate::config::validate_identifier;
use crate::error::ConfigError;
use std::net::SocketAddr;

impl AppConfig {
    /// Read config from the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from any key lookup. Unset or blank keys fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let database_url = get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());

        let schema = get("BOOKS_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into());
        validate_identifier("BOOKS_SCHEMA", &schema)?;

        let store = match get("BOOKS_STORE") {
            Some(v) => v.parse().map_err(|reason| ConfigError::Invalid {
                var: "BOOKS_STORE",
                reason,
            })?,
            None => StoreBackend::Postgres,
        };

        let bind_raw = get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into());
        let bind_addr: SocketAddr = bind_raw.parse().map_err(|e| ConfigError::Invalid {
            var: "BIND_ADDR",
            reason: format!("'{}': {}", bind_raw, e),
        })?;

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => {
                let n: u32 = v.parse().map_err(|_| ConfigError::Invalid {
                    var: "DB_MAX_CONNECTIONS",
                    reason: format!("'{}' is not a positive integer", v),
                })?;
                if n == 0 {
                    return Err(ConfigError::Invalid {
                        var: "DB_MAX_CONNECTIONS",
                        reason: "must be at least 1".into(),
                    });
                }
                n
            }
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let body_limit_bytes = match get("BODY_LIMIT_BYTES") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "BODY_LIMIT_BYTES",
                reason: format!("'{}' is not a byte count", v),
            })?,
            None => DEFAULT_BODY_LIMIT_BYTES,
        };

        Ok(AppConfig {
            database_url,
            schema,
            store,
            bind_addr,
            max_connections,
            body_limit_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| env.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = load(&[]).unwrap();
        assert_eq!(cfg.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(cfg.schema, DEFAULT_SCHEMA);
        assert_eq!(cfg.store, StoreBackend::Postgres);
        assert_eq!(cfg.bind_addr.port(), 3000);
        assert_eq!(cfg.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(cfg.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            ("DATABASE_URL", "postgres://db:5432/shelf"),
            ("BOOKS_SCHEMA", "shelf"),
            ("BOOKS_STORE", "Memory"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("BODY_LIMIT_BYTES", "1024"),
        ])
        .unwrap();
        assert_eq!(cfg.database_url, "postgres://db:5432/shelf");
        assert_eq!(cfg.schema, "shelf");
        assert_eq!(cfg.store, StoreBackend::Memory);
        assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.max_connections, 12);
        assert_eq!(cfg.body_limit_bytes, 1024);
    }

    #[test]
    fn blank_values_fall_back() {
        let cfg = load(&[("BOOKS_SCHEMA", "  ")]).unwrap();
        assert_eq!(cfg.schema, DEFAULT_SCHEMA);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            load(&[("BOOKS_STORE", "redis")]),
            Err(ConfigError::Invalid { var: "BOOKS_STORE", .. })
        ));
        assert!(matches!(
            load(&[("DB_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::Invalid { var: "DB_MAX_CONNECTIONS", .. })
        ));
        assert!(matches!(
            load(&[("BIND_ADDR", "nowhere")]),
            Err(ConfigError::Invalid { var: "BIND_ADDR", .. })
        ));
        assert!(matches!(
            load(&[("BOOKS_SCHEMA", "x;y")]),
            Err(ConfigError::InvalidIdentifier { .. })
        ));
    }
}
