//! Servicio de usuarios con patrón cache-aside
//!
//! Flujo de una consulta:
//!
//! ```text
//! CheckCache --hit--> (CacheHit)
//! CheckCache --miss--> QueryStore --found--> WriteCache --> (FreshFromStore)
//!                      QueryStore --not found--> (NotFound)
//! ```
//!
//! Cada llamada recorre la máquina una sola vez. La escritura en cache es
//! best-effort: su fallo se registra y se cuenta, pero la lectura sigue
//! siendo exitosa.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

use crate::cache::{usuario_key, CacheStore, CACHE_TTL};
use crate::repositories::UserStore;
use crate::utils::errors::{AppError, AppResult};

/// Resultado terminal de una consulta
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Payload JSON leído de cache
    CacheHit(String),
    /// Payload JSON recién leído de PostgreSQL (y escrito en cache)
    FreshFromStore(String),
    NotFound,
}

impl LookupOutcome {
    pub fn payload(&self) -> Option<&str> {
        match self {
            LookupOutcome::CacheHit(p) | LookupOutcome::FreshFromStore(p) => Some(p),
            LookupOutcome::NotFound => None,
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self, LookupOutcome::CacheHit(_))
    }
}

/// Línea de estado legible para cada resultado terminal
pub fn status_line(outcome: &LookupOutcome, id: i32) -> String {
    match outcome {
        LookupOutcome::CacheHit(payload) => format!("Datos obtenidos del cache Redis: {}", payload),
        LookupOutcome::FreshFromStore(payload) => {
            format!("Datos obtenidos de PostgreSQL: {}", payload)
        }
        LookupOutcome::NotFound => format!("Usuario {} no encontrado en PostgreSQL", id),
    }
}

enum LookupState {
    CheckCache,
    QueryStore,
    WriteCache(String),
    Done(LookupOutcome),
}

/// Contadores de consultas
#[derive(Debug, Default)]
pub struct LookupStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    store_hits: AtomicU64,
    not_found: AtomicU64,
    cache_read_errors: AtomicU64,
    cache_write_errors: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LookupStatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub store_hits: u64,
    pub not_found: u64,
    pub cache_read_errors: u64,
    pub cache_write_errors: u64,
}

impl LookupStats {
    pub fn snapshot(&self) -> LookupStatsSnapshot {
        LookupStatsSnapshot {
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            store_hits: self.store_hits.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            cache_read_errors: self.cache_read_errors.load(Ordering::Relaxed),
            cache_write_errors: self.cache_write_errors.load(Ordering::Relaxed),
        }
    }

    fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct UsuarioService {
    cache: Arc<dyn CacheStore>,
    store: Arc<dyn UserStore>,
    stats: LookupStats,
}

impl UsuarioService {
    pub fn new(cache: Arc<dyn CacheStore>, store: Arc<dyn UserStore>) -> Self {
        Self {
            cache,
            store,
            stats: LookupStats::default(),
        }
    }

    pub fn stats(&self) -> LookupStatsSnapshot {
        self.stats.snapshot()
    }

    pub fn cache(&self) -> &Arc<dyn CacheStore> {
        &self.cache
    }

    pub fn store(&self) -> &Arc<dyn UserStore> {
        &self.store
    }

    /// Obtener un usuario: cache primero, PostgreSQL en caso de miss
    pub async fn get_usuario(&self, id: i32) -> AppResult<LookupOutcome> {
        if id <= 0 {
            return Err(AppError::InvalidId(format!(
                "user id must be a positive integer, got {}",
                id
            )));
        }

        let key = usuario_key(id);
        let mut state = LookupState::CheckCache;

        loop {
            state = match state {
                LookupState::CheckCache => self.check_cache(&key).await,
                LookupState::QueryStore => self.query_store(id).await?,
                LookupState::WriteCache(payload) => {
                    self.write_back(&key, &payload).await;
                    LookupState::Done(LookupOutcome::FreshFromStore(payload))
                }
                LookupState::Done(outcome) => return Ok(outcome),
            };
        }
    }

    async fn check_cache(&self, key: &str) -> LookupState {
        match self.cache.get(key).await {
            // Un valor vacío cuenta como ausente
            Ok(Some(payload)) if !payload.is_empty() => {
                LookupStats::incr(&self.stats.cache_hits);
                info!("📥 Datos obtenidos del cache: {}", key);
                LookupState::Done(LookupOutcome::CacheHit(payload))
            }
            Ok(_) => {
                LookupStats::incr(&self.stats.cache_misses);
                info!("❌ {} no estaba en cache, consultando PostgreSQL...", key);
                LookupState::QueryStore
            }
            Err(e) => {
                LookupStats::incr(&self.stats.cache_read_errors);
                LookupStats::incr(&self.stats.cache_misses);
                warn!("⚠️ Error leyendo cache para {}, se trata como miss: {}", key, e);
                LookupState::QueryStore
            }
        }
    }

    async fn query_store(&self, id: i32) -> AppResult<LookupState> {
        match self.store.find_by_id(id).await? {
            Some(user) => {
                let payload = serde_json::to_string(&user)?;
                LookupStats::incr(&self.stats.store_hits);
                info!("🐘 Datos obtenidos de PostgreSQL: {}", payload);
                Ok(LookupState::WriteCache(payload))
            }
            None => {
                LookupStats::incr(&self.stats.not_found);
                info!("🔍 Usuario {} no encontrado en PostgreSQL", id);
                Ok(LookupState::Done(LookupOutcome::NotFound))
            }
        }
    }

    /// Escritura best-effort: nunca propaga el error
    async fn write_back(&self, key: &str, payload: &str) {
        if let Err(e) = self.cache.set_with_ttl(key, payload, CACHE_TTL).await {
            LookupStats::incr(&self.stats.cache_write_errors);
            warn!("⚠️ No se pudo guardar {} en cache: {}", key, e);
        }
    }
}
