//! Modelo de User
//!
//! Mapea exactamente las columnas `id` y `name` de la tabla `users`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Snapshot inmutable de un usuario leído de PostgreSQL.
///
/// El JSON que se guarda en cache usa los mismos nombres de campo:
/// `{"id":1,"name":"Alice"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub name: String,
}

impl User {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shape() {
        let user = User::new(1, "Alice");
        let json = serde_json::to_string(&user).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"Alice"}"#);
    }

    #[test]
    fn test_payload_parses_back() {
        let user: User = serde_json::from_str(r#"{"id":7,"name":"Bruno"}"#).unwrap();
        assert_eq!(user, User::new(7, "Bruno"));
    }
}
