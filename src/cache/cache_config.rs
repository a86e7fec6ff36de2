//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use std::str::FromStr;
use std::time::Duration;

use crate::utils::errors::AppError;

/// TTL fijo de las entradas de usuario
pub const CACHE_TTL: Duration = Duration::from_secs(60);

/// Prefijo de las claves de usuario
pub const USUARIO_PREFIX: &str = "usuario";

/// Backend de cache a utilizar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Redis,
    Memory,
}

impl FromStr for CacheBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(CacheBackend::Redis),
            "memory" => Ok(CacheBackend::Memory),
            other => Err(AppError::Configuration(format!(
                "CACHE_BACKEND must be 'redis' or 'memory', got '{}'",
                other
            ))),
        }
    }
}

/// Configuración del cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub redis_url: String,
    pub backend: CacheBackend,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            backend: CacheBackend::Redis,
        }
    }
}
