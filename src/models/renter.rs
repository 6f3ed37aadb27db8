//! Modelo de Renter
//!
//! El CRUD de renters vive fuera de este servicio; aquí solo se leen
//! para resolver la identidad del usuario autenticado.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Renter - mapea a la tabla renters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Renter {
    pub renter_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub username: String,
    pub created_at: DateTime<Utc>,
}
