//! Consulta de usuarios con patrón cache-aside sobre PostgreSQL y Redis.

pub mod api;
pub mod cache;
pub mod config;
pub mod database;
pub mod models;
pub mod repositories;
pub mod services;
pub mod state;
pub mod utils;

pub use services::{LookupOutcome, UsuarioService};
pub use utils::errors::{AppError, AppResult};
