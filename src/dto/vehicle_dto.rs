use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::{validate_not_empty, validate_plate_number, validate_price};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom = "validate_not_empty")]
    pub vehicle_type: String,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub model: String,
    #[validate(custom = "validate_plate_number")]
    pub plate_number: String,
    #[validate(custom = "validate_price")]
    pub price_per_day: Decimal,
    pub status: Option<String>,
}

// Request para actualizar un vehículo (parcial)
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVehicleRequest {
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 50), custom = "validate_not_empty")]
    pub vehicle_type: Option<String>,
    #[validate(length(min = 1, max = 100), custom = "validate_not_empty")]
    pub model: Option<String>,
    #[validate(custom = "validate_plate_number")]
    pub plate_number: Option<String>,
    #[validate(custom = "validate_price")]
    pub price_per_day: Option<Decimal>,
    pub status: Option<String>,
}

// Request para cambiar solo el estado
#[derive(Debug, Deserialize)]
pub struct VehicleStatusRequest {
    pub status: String,
}

// Filtros del listado
#[derive(Debug, Default, Deserialize)]
pub struct VehicleListQuery {
    pub status: Option<String>,
}
