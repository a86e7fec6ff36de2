//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    /// El cache no respondió (conexión caída, escritura rechazada).
    /// En lecturas se degrada a cache miss; nunca hace fallar una consulta.
    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    /// No se pudo obtener conexión con PostgreSQL
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Consulta mal formada o columna que no mapea al modelo
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => AppError::StoreUnavailable(e.to_string()),
            other => AppError::Database(other.to_string()),
        }
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::CacheUnavailable(e.to_string())
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    code: String,
}

impl AppError {
    fn status_and_code(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            AppError::CacheUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Cache Unavailable", "CACHE_UNAVAILABLE")
            }
            AppError::StoreUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "Store Unavailable", "STORE_UNAVAILABLE")
            }
            AppError::Database(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Database Error", "DB_ERROR")
            }
            AppError::Serialization(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Serialization Error", "SERIALIZATION_ERROR")
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "Not Found", "NOT_FOUND"),
            AppError::InvalidId(_) => (StatusCode::BAD_REQUEST, "Bad Request", "INVALID_ID"),
            AppError::Configuration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Configuration Error", "CONFIG_ERROR")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, code) = self.status_and_code();

        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        // Los detalles internos de BD no salen hacia el cliente
        let message = match &self {
            AppError::Database(_) => "An error occurred while accessing the database".to_string(),
            AppError::Serialization(_) => "The entity could not be encoded".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: error.to_string(),
            message,
            code: code.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}
