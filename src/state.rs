//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::services::UsuarioService;

#[derive(Clone)]
pub struct AppState {
    pub usuarios: Arc<UsuarioService>,
}

impl AppState {
    pub fn new(usuarios: UsuarioService) -> Self {
        Self {
            usuarios: Arc::new(usuarios),
        }
    }
}
