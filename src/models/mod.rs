//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL.

pub mod auth;
pub mod employee;
pub mod payment;
pub mod rental;
pub mod renter;
pub mod vehicle;
