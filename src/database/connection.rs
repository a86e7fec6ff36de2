//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool de conexiones. Cada consulta toma una conexión
//! del pool y la devuelve al terminar, con éxito o con error.

use sqlx::PgPool;
use tracing::info;

use crate::config::database::DatabaseConfig;
use crate::utils::errors::AppResult;

/// Pool de PostgreSQL ya conectado
#[derive(Clone)]
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Crear un pool de conexiones a la base de datos
    pub async fn new(config: &DatabaseConfig) -> AppResult<Self> {
        info!("🔗 Conectando a PostgreSQL: {}", mask_database_url(&config.url));

        let pool = config.create_pool().await?;

        info!("✅ PostgreSQL conectado exitosamente");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Cerrar el pool esperando a que se devuelvan las conexiones
    pub async fn close(&self) {
        self.pool.close().await;
        info!("🔒 Pool de PostgreSQL cerrado");
    }
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }
    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
