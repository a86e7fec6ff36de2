//! Cache en memoria
//!
//! Backend local para desarrollo sin Redis. Cada entrada guarda su
//! instante de expiración; las entradas vencidas se tratan como ausentes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use super::CacheStore;
use crate::utils::errors::AppResult;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tiempo restante de una clave, `None` si no existe o ya expiró
    pub async fn ttl(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .and_then(|entry| entry.expires_at.checked_duration_since(Instant::now()))
            .filter(|remaining| !remaining.is_zero())
    }

    /// Cantidad de claves vivas
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries.values().filter(|e| e.expires_at > now).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > now => {
                    debug!("📥 Cache HIT (memoria) para clave: {}", key);
                    return Ok(Some(entry.value.clone()));
                }
                Some(_) => {}
                None => {
                    debug!("❌ Cache MISS (memoria) para clave: {}", key);
                    return Ok(None);
                }
            }
        }

        // Expirada: purgar
        let mut entries = self.entries.write().await;
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
            debug!("⏰ Cache EXPIRADO (memoria) para clave: {}", key);
        }
        Ok(None)
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        let now = Instant::now();
        let entry = Entry {
            value: value.to_string(),
            expires_at: now + ttl,
        };

        let mut entries = self.entries.write().await;
        // Purga de claves vencidas que nunca se vuelven a leer
        entries.retain(|_, e| e.expires_at > now);
        entries.insert(key.to_string(), entry);
        debug!("💾 Cache SET (memoria) para clave: {} (TTL: {}s)", key, ttl.as_secs());
        Ok(())
    }

    async fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = MemoryCache::new();
        cache
            .set_with_ttl("usuario:1", "{}", Duration::from_secs(60))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert_eq!(cache.get("usuario:1").await.unwrap().as_deref(), Some("{}"));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("usuario:1").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_overwrites_and_resets_ttl() {
        let cache = MemoryCache::new();
        cache.set_with_ttl("k", "a", Duration::from_secs(60)).await.unwrap();
        tokio::time::advance(Duration::from_secs(30)).await;
        cache.set_with_ttl("k", "b", Duration::from_secs(60)).await.unwrap();

        assert_eq!(cache.get("k").await.unwrap().as_deref(), Some("b"));
        assert_eq!(cache.ttl("k").await, Some(Duration::from_secs(60)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_purges_expired_keys() {
        let cache = MemoryCache::new();
        cache.set_with_ttl("usuario:1", "a", Duration::from_secs(10)).await.unwrap();
        cache.set_with_ttl("usuario:2", "b", Duration::from_secs(60)).await.unwrap();

        tokio::time::advance(Duration::from_secs(11)).await;
        cache.set_with_ttl("usuario:3", "c", Duration::from_secs(60)).await.unwrap();

        let entries = cache.entries.read().await;
        assert_eq!(entries.len(), 2);
        assert!(!entries.contains_key("usuario:1"));
        assert!(entries.contains_key("usuario:2"));
    }

    #[tokio::test]
    async fn test_missing_key() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("usuario:999").await.unwrap(), None);
        assert_eq!(cache.ttl("usuario:999").await, None);
    }
}
