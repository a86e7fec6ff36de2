//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos, cache
//! y variables de entorno.

pub mod database;
pub mod environment;

pub use database::DatabaseConfig;
pub use environment::EnvironmentConfig;
