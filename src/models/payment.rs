//! Modelo de Payment

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Método usado cuando el renter no indica ninguno
pub const DEFAULT_PAYMENT_METHOD: &str = "online";

/// Payment - mapea a la tabla payments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Payment {
    pub payment_id: i64,
    pub rental_id: i64,
    pub amount: Decimal,
    pub payment_date: DateTime<Utc>,
    pub method: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Datos para registrar un pago
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub rental_id: i64,
    pub amount: Decimal,
    pub method: String,
}

/// Respuesta de un pago: el pago registrado y el alquiler ya en `paid`
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    pub payment: Payment,
    pub rental: super::rental::Rental,
}
