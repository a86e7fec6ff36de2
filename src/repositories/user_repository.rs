use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::models::user::User;
use crate::utils::errors::AppResult;

/// Consulta puntual de usuarios en el almacenamiento durable
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Buscar un usuario por clave primaria. Cero filas es `Ok(None)`.
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>>;

    /// Verificar si el almacenamiento responde
    async fn ping(&self) -> AppResult<()>;
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    async fn find_by_id(&self, id: i32) -> AppResult<Option<User>> {
        debug!("🐘 SELECT users WHERE id = {}", id);

        let result = sqlx::query_as::<_, User>("SELECT id, name FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(result)
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
