use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, RedisResult};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use super::{CacheConfig, CacheStore};
use crate::utils::errors::{AppError, AppResult};

/// Intervalo mínimo entre intentos de reconexión
pub const RECONNECT_INTERVAL: Duration = Duration::from_secs(5);

/// Cliente Redis sobre un `ConnectionManager` (reconexión automática)
///
/// Si Redis no responde al arrancar, el cliente queda pendiente: cada
/// operación devuelve `CacheUnavailable` y, como mucho una vez cada
/// `RECONNECT_INTERVAL`, se vuelve a intentar abrir la conexión.
#[derive(Clone)]
pub struct RedisClient {
    client: Option<redis::Client>,
    manager: Arc<RwLock<Option<ConnectionManager>>>,
    last_attempt: Arc<Mutex<Option<Instant>>>,
}

impl RedisClient {
    /// Crear nuevo cliente Redis
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        info!("🔗 Conectando a Redis: {}", config.redis_url);

        let client = redis::Client::open(config.redis_url.clone())?;
        let manager = ConnectionManager::new(client.clone()).await?;

        // Test de conexión usando un comando simple
        let mut conn = manager.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        info!("✅ Redis conectado exitosamente");

        Ok(Self {
            client: Some(client),
            manager: Arc::new(RwLock::new(Some(manager))),
            last_attempt: Arc::new(Mutex::new(Some(Instant::now()))),
        })
    }

    /// Conectar, o arrancar sin conexión si Redis no está disponible
    pub async fn connect_or_disabled(config: &CacheConfig) -> Self {
        match Self::new(config).await {
            Ok(client) => client,
            Err(e) => match redis::Client::open(config.redis_url.clone()) {
                Ok(client) => {
                    warn!("⚠️ Redis no disponible ({}), se reintentará en segundo plano", e);
                    Self::pending(client)
                }
                Err(_) => {
                    warn!("⚠️ URL de Redis inválida ({}), se continúa sin cache", e);
                    Self::disabled()
                }
            },
        }
    }

    /// Cliente sin conexión que nunca intenta reconectar
    pub fn disabled() -> Self {
        Self {
            client: None,
            manager: Arc::new(RwLock::new(None)),
            last_attempt: Arc::new(Mutex::new(None)),
        }
    }

    fn pending(client: redis::Client) -> Self {
        Self {
            client: Some(client),
            manager: Arc::new(RwLock::new(None)),
            last_attempt: Arc::new(Mutex::new(Some(Instant::now()))),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    async fn connection(&self) -> AppResult<ConnectionManager> {
        if let Some(manager) = self.manager.read().await.as_ref() {
            return Ok(manager.clone());
        }

        let Some(client) = &self.client else {
            return Err(AppError::CacheUnavailable("Redis is disabled".to_string()));
        };

        let mut last_attempt = self.last_attempt.lock().await;

        // Otra tarea pudo reconectar mientras se esperaba el lock
        if let Some(manager) = self.manager.read().await.as_ref() {
            return Ok(manager.clone());
        }

        let now = Instant::now();
        if !reconnect_due(*last_attempt, now) {
            return Err(AppError::CacheUnavailable("Redis is not connected".to_string()));
        }
        *last_attempt = Some(now);

        debug!("🔄 Reintentando conexión a Redis");
        match ConnectionManager::new(client.clone()).await {
            Ok(manager) => {
                info!("✅ Redis reconectado");
                *self.manager.write().await = Some(manager.clone());
                Ok(manager)
            }
            Err(e) => Err(AppError::CacheUnavailable(format!(
                "Redis reconnect failed: {}",
                e
            ))),
        }
    }
}

fn reconnect_due(last_attempt: Option<Instant>, now: Instant) -> bool {
    last_attempt.map_or(true, |t| now.duration_since(t) >= RECONNECT_INTERVAL)
}

#[async_trait]
impl CacheStore for RedisClient {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.connection().await?;

        let value: Option<String> = conn.get(key).await.map_err(|e| {
            AppError::CacheUnavailable(format!("Failed to get key '{}': {}", key, e))
        })?;

        match &value {
            Some(_) => debug!("📥 Cache HIT para clave: {}", key),
            None => debug!("❌ Cache MISS para clave: {}", key),
        }

        Ok(value)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let mut conn = self.connection().await?;
        let ttl_secs = ttl.as_secs().max(1);

        let result: RedisResult<()> = conn.set_ex(key, value, ttl_secs).await;

        match result {
            Ok(()) => {
                debug!("💾 Cache SET para clave: {} (TTL: {}s)", key, ttl_secs);
                Ok(())
            }
            Err(e) => Err(AppError::CacheUnavailable(format!(
                "Failed to set key '{}': {}",
                key, e
            ))),
        }
    }

    async fn is_connected(&self) -> bool {
        let Ok(mut conn) = self.connection().await else {
            return false;
        };
        match redis::cmd("PING").query_async::<_, String>(&mut conn).await {
            Ok(response) => response == "PONG",
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disabled_client_reports_unavailable() {
        let client = RedisClient::disabled();
        assert!(!client.is_enabled());
        assert!(!client.is_connected().await);

        let err = client.get("usuario:1").await.unwrap_err();
        assert!(matches!(err, AppError::CacheUnavailable(_)));

        let err = client
            .set_with_ttl("usuario:1", "{}", Duration::from_secs(60))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::CacheUnavailable(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_is_rejected() {
        let config = CacheConfig {
            redis_url: "not-a-url".to_string(),
            ..CacheConfig::default()
        };
        assert!(RedisClient::new(&config).await.is_err());

        let client = RedisClient::connect_or_disabled(&config).await;
        assert!(!client.is_enabled());
    }

    #[tokio::test]
    async fn test_pending_client_keeps_retry_enabled() {
        let client = redis::Client::open("redis://127.0.0.1:1").unwrap();
        let pending = RedisClient::pending(client);

        // Sigue habilitado para reconectar, pero dentro del intervalo no intenta
        assert!(pending.is_enabled());
        let err = pending.get("usuario:1").await.unwrap_err();
        assert!(matches!(err, AppError::CacheUnavailable(_)));
        assert!(pending.manager.read().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reconnect_due_after_interval() {
        let t = Instant::now();
        assert!(reconnect_due(None, t));
        assert!(!reconnect_due(Some(t), t + Duration::from_secs(4)));
        assert!(reconnect_due(Some(t), t + RECONNECT_INTERVAL));
    }
}
