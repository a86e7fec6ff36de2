//! Dobles de prueba para PostgreSQL y cache

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use usuario_cache::cache::{CacheStore, MemoryCache};
use usuario_cache::models::User;
use usuario_cache::repositories::UserStore;
use usuario_cache::{AppError, AppResult, UsuarioService};

/// Tabla `users` en memoria que cuenta las consultas recibidas
#[derive(Default)]
pub struct FakeUserStore {
    rows: HashMap<i32, User>,
    queries: AtomicUsize,
    unavailable: AtomicBool,
}

impl FakeUserStore {
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            rows: users.into_iter().map(|u| (u.id, u)).collect(),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }
}

#[async_trait]
impl UserStore for FakeUserStore {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("connection refused".to_string()));
        }
        Ok(self.rows.get(&id).cloned())
    }

    async fn ping(&self) -> AppResult<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable("connection refused".to_string()));
        }
        Ok(())
    }
}

/// Cache envuelto en `MemoryCache` con fallos inyectables
#[derive(Default)]
pub struct FlakyCache {
    pub inner: MemoryCache,
    pub fail_reads: AtomicBool,
    pub fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl FlakyCache {
    pub fn failing_reads() -> Self {
        let cache = Self::default();
        cache.fail_reads.store(true, Ordering::SeqCst);
        cache
    }

    pub fn failing_writes() -> Self {
        let cache = Self::default();
        cache.fail_writes.store(true, Ordering::SeqCst);
        cache
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CacheStore for FlakyCache {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::CacheUnavailable("read timeout".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> AppResult<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(AppError::CacheUnavailable("write rejected".to_string()));
        }
        self.inner.set_with_ttl(key, value, ttl).await
    }

    async fn is_connected(&self) -> bool {
        !self.fail_reads.load(Ordering::SeqCst)
    }
}

pub fn alice() -> User {
    User::new(1, "Alice")
}

pub fn service_with(
    cache: Arc<FlakyCache>,
    store: Arc<FakeUserStore>,
) -> UsuarioService {
    UsuarioService::new(cache, store)
}
