//! Servicios de negocio

pub mod usuario_service;

pub use usuario_service::{status_line, LookupOutcome, LookupStatsSnapshot, UsuarioService};
