//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

use crate::cache::{CacheBackend, CacheConfig};
use crate::config::database::DatabaseConfig;
use crate::utils::errors::{AppError, AppResult};

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub host: String,
    pub port: u16,
    pub log_level: tracing::Level,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Construir la configuración a partir de una función de búsqueda de variables
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or_else(|| {
            AppError::Configuration("DATABASE_URL must be set".to_string())
        })?;

        let port = match lookup("PORT") {
            Some(port) => port.parse().map_err(|_| {
                AppError::Configuration(format!("PORT must be a valid number, got '{}'", port))
            })?,
            None => 3000,
        };

        let log_level = match lookup("LOG_LEVEL") {
            Some(level) => level.parse().map_err(|_| {
                AppError::Configuration(format!("LOG_LEVEL is not a valid level: '{}'", level))
            })?,
            None => tracing::Level::INFO,
        };

        let defaults = CacheConfig::default();
        let cache = CacheConfig {
            redis_url: lookup("REDIS_URL").unwrap_or(defaults.redis_url),
            backend: match lookup("CACHE_BACKEND") {
                Some(backend) => backend.parse::<CacheBackend>()?,
                None => defaults.backend,
            },
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            log_level,
            database: DatabaseConfig::new(database_url),
            cache,
        })
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            EnvironmentConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://db")]))
                .unwrap();

        assert_eq!(config.server_url(), "0.0.0.0:3000");
        assert_eq!(config.log_level, tracing::Level::INFO);
        assert_eq!(config.cache.redis_url, "redis://localhost:6379");
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.database.url, "postgres://db");
    }

    #[test]
    fn test_database_url_is_required() {
        let err = EnvironmentConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }

    #[test]
    fn test_overrides() {
        let config = EnvironmentConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("REDIS_URL", "redis://cache:6380"),
            ("CACHE_BACKEND", "memory"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("LOG_LEVEL", "debug"),
        ]))
        .unwrap();

        assert_eq!(config.server_url(), "127.0.0.1:8080");
        assert_eq!(config.log_level, tracing::Level::DEBUG);
        assert_eq!(config.cache.redis_url, "redis://cache:6380");
        assert_eq!(config.cache.backend, CacheBackend::Memory);
    }

    #[test]
    fn test_invalid_port() {
        let err = EnvironmentConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://db"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
    }
}
