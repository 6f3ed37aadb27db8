//! Backend de alquiler de vehículos
//!
//! API REST sobre PostgreSQL: ciclo de vida de alquileres con detección
//! de solapamientos, gestión de vehículos y listados de gestión, con
//! control de acceso por rol.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
