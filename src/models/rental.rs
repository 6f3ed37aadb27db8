//! Modelo de Rental
//!
//! Este módulo contiene el struct Rental, su máquina de estados
//! y las reglas de fechas y coste que comparten todas las operaciones.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

use crate::utils::errors::{field_validation_error, AppResult};
use crate::utils::validation::{validate_date_order, validate_price};

/// Estado del alquiler - mapea al ENUM rental_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "rental_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Pending,
    Approved,
    Paid,
    Rented,
    Returned,
    Rejected,
    Cancelled,
}

impl RentalStatus {
    /// Estados que reclaman la disponibilidad del vehículo
    pub const ACTIVE: [RentalStatus; 4] = [
        RentalStatus::Pending,
        RentalStatus::Approved,
        RentalStatus::Paid,
        RentalStatus::Rented,
    ];

    /// Estados que mantienen el vehículo comprometido
    pub const HOLDING: [RentalStatus; 3] = [
        RentalStatus::Approved,
        RentalStatus::Paid,
        RentalStatus::Rented,
    ];

    /// Estados finales, sin más transiciones
    pub const TERMINAL: [RentalStatus; 3] = [
        RentalStatus::Returned,
        RentalStatus::Rejected,
        RentalStatus::Cancelled,
    ];

    pub fn is_active(self) -> bool {
        Self::ACTIVE.contains(&self)
    }

    pub fn is_holding(self) -> bool {
        Self::HOLDING.contains(&self)
    }

    pub fn is_terminal(self) -> bool {
        Self::TERMINAL.contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RentalStatus::Pending => "pending",
            RentalStatus::Approved => "approved",
            RentalStatus::Paid => "paid",
            RentalStatus::Rented => "rented",
            RentalStatus::Returned => "returned",
            RentalStatus::Rejected => "rejected",
            RentalStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(RentalStatus::Pending),
            "approved" => Ok(RentalStatus::Approved),
            "paid" => Ok(RentalStatus::Paid),
            "rented" => Ok(RentalStatus::Rented),
            "returned" => Ok(RentalStatus::Returned),
            "rejected" => Ok(RentalStatus::Rejected),
            "cancelled" | "canceled" => Ok(RentalStatus::Cancelled),
            other => Err(format!("unknown rental status '{}'", other)),
        }
    }
}

/// Rango de fechas inclusivo [start, end] con end >= start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> AppResult<Self> {
        validate_date_order(start, end).map_err(|e| field_validation_error("end_date", e))?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Dos rangos se solapan si comparten al menos un día
    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Número de días naturales, contando ambos extremos
    pub fn inclusive_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Coste total = precio por día × días inclusivos, redondeado a céntimos
pub fn compute_total_cost(price_per_day: Decimal, range: &DateRange) -> Decimal {
    (price_per_day * Decimal::from(range.inclusive_days())).round_dp(2)
}

/// Coste total que además cabe en la columna `total_cost`
pub fn checked_total_cost(price_per_day: Decimal, range: &DateRange) -> AppResult<Decimal> {
    let total = compute_total_cost(price_per_day, range);
    validate_price(&total).map_err(|e| field_validation_error("total_cost", e))?;
    Ok(total)
}

/// Rental principal - mapea exactamente a la tabla rentals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Rental {
    pub rental_id: i64,
    pub renter_id: i64,
    pub vehicle_id: i64,
    pub approved_by_id: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_cost: Decimal,
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Rental {
    /// Rango del alquiler; la tabla garantiza end_date >= start_date
    pub fn range(&self) -> DateRange {
        DateRange {
            start: self.start_date,
            end: self.end_date,
        }
    }

    pub fn is_owned_by(&self, renter_id: i64) -> bool {
        self.renter_id == renter_id
    }
}

/// Datos para insertar un alquiler nuevo (siempre en `pending`)
#[derive(Debug, Clone)]
pub struct NewRental {
    pub renter_id: i64,
    pub vehicle_id: i64,
    pub range: DateRange,
    pub total_cost: Decimal,
}
