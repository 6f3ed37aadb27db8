//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y su estado. El estado es una
//! caché de los alquileres activos y lo mantiene el ciclo de vida.

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Estado del vehículo - mapea al ENUM vehicle_status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type)]
#[sqlx(type_name = "vehicle_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Available,
    Reserved,
    Rented,
    Maintenance,
}

impl VehicleStatus {
    /// Un vehículo solo admite solicitudes nuevas si está disponible
    pub fn accepts_requests(self) -> bool {
        matches!(self, VehicleStatus::Available)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VehicleStatus::Available => "available",
            VehicleStatus::Reserved => "reserved",
            VehicleStatus::Rented => "rented",
            VehicleStatus::Maintenance => "maintenance",
        }
    }

    /// Parseo tolerante de la entrada del panel (mayúsculas, "under maintenance")
    pub fn parse_lenient(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "available" => Some(VehicleStatus::Available),
            "reserved" => Some(VehicleStatus::Reserved),
            "rented" => Some(VehicleStatus::Rented),
            "maintenance" | "under maintenance" => Some(VehicleStatus::Maintenance),
            _ => None,
        }
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub vehicle_id: i64,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub model: String,
    pub plate_number: String,
    pub price_per_day: Decimal,
    pub status: VehicleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Datos para insertar o reescribir un vehículo
#[derive(Debug, Clone)]
pub struct VehicleData {
    pub vehicle_type: String,
    pub model: String,
    pub plate_number: String,
    pub price_per_day: Decimal,
    pub status: VehicleStatus,
}

impl From<&Vehicle> for VehicleData {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            vehicle_type: vehicle.vehicle_type.clone(),
            model: vehicle.model.clone(),
            plate_number: vehicle.plate_number.clone(),
            price_per_day: vehicle.price_per_day,
            status: vehicle.status,
        }
    }
}
