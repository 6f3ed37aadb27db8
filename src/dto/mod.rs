//! DTOs de la API
//!
//! Cuerpos de request y respuestas que no son modelos directos.

pub mod rental_dto;
pub mod vehicle_dto;
