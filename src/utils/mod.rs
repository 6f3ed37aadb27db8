//! Utilidades del sistema
//!
//! Este módulo contiene utilidades para manejo de errores, validación,
//! extractores de Axum y JWT.

pub mod errors;
pub mod extract;
pub mod jwt;
pub mod validation;
