//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! usadas por los DTOs con `validator`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

/// Número de decimales permitidos en importes
pub const MONEY_SCALE: u32 = 2;

/// Mayor importe que cabe en una columna NUMERIC(10, 2)
pub const MAX_MONEY: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 2);

/// Validar que la fecha final no sea anterior a la inicial
pub fn validate_date_order(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        let mut error = ValidationError::new("date_order");
        error.message = Some("end_date must be on or after start_date".into());
        error.add_param("start_date".into(), &start.to_string());
        error.add_param("end_date".into(), &end.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea no negativo
pub fn validate_non_negative<T: PartialOrd + std::fmt::Display + num_traits::Zero + Serialize>(
    value: T,
) -> Result<(), ValidationError> {
    if value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un importe tenga como mucho dos decimales
pub fn validate_money_scale(value: &Decimal) -> Result<(), ValidationError> {
    if value.normalize().scale() > MONEY_SCALE {
        let mut error = ValidationError::new("money_scale");
        error.add_param("value".into(), &value.to_string());
        error.add_param("max_fraction_digits".into(), &MONEY_SCALE);
        return Err(error);
    }
    Ok(())
}

/// Validar que un importe no supere `MAX_MONEY`
pub fn validate_money_bound(value: &Decimal) -> Result<(), ValidationError> {
    if *value > MAX_MONEY {
        let mut error = ValidationError::new("money_bound");
        error.add_param("value".into(), &value.to_string());
        error.add_param("max".into(), &MAX_MONEY.to_string());
        return Err(error);
    }
    Ok(())
}

/// Precio o coste: no negativo, acotado y con dos decimales como máximo
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(*value)?;
    validate_money_bound(value)?;
    validate_money_scale(value)
}

/// Importe de un pago: positivo, acotado y con dos decimales como máximo
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(*value)?;
    validate_money_bound(value)?;
    validate_money_scale(value)
}

/// Validar formato de matrícula de vehículo
pub fn validate_plate_number(value: &str) -> Result<(), ValidationError> {
    validate_not_empty(value)?;
    let clean_plate = value.replace([' ', '-', '_'], "");
    if clean_plate.is_empty() || value.chars().count() > 20 {
        let mut error = ValidationError::new("plate_number");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
