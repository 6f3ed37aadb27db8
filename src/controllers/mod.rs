//! Controllers
//!
//! Operaciones CRUD y listados que las rutas invocan; las transiciones
//! del ciclo de vida viven en `services`.

pub mod rental_controller;
pub mod report_controller;
pub mod vehicle_controller;
