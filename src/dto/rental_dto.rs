use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::validation::validate_price;

// Solicitud de alquiler de un renter (renter_id sale del token)
#[derive(Debug, Deserialize)]
pub struct RentalRequestBody {
    pub vehicle_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Alta directa por un empleado
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRentalRequest {
    pub renter_id: i64,
    pub vehicle_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(custom = "validate_price")]
    pub total_cost: Option<Decimal>,
}

// Edición parcial; el estado no se edita aquí
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateRentalRequest {
    pub renter_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub approved_by_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[validate(custom = "validate_price")]
    pub total_cost: Option<Decimal>,
}

// Pago: importe y método opcionales
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PayRequest {
    pub amount: Option<Decimal>,
    #[validate(length(max = 50))]
    pub method: Option<String>,
}

// Filtros del listado
#[derive(Debug, Default, Deserialize)]
pub struct RentalListQuery {
    pub status: Option<String>,
    pub vehicle_id: Option<i64>,
}

// Respuesta de la purga del historial
#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub message: String,
    pub deleted_count: u64,
}
