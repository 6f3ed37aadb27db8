//! Comprobación de disponibilidad de vehículos
//!
//! Búsqueda pura sobre los alquileres activos de un vehículo. Quien la
//! llama es responsable de haber bloqueado antes la fila del vehículo,
//! de lo contrario el resultado puede quedar obsoleto antes de escribir.

use crate::models::rental::{DateRange, Rental};
use crate::utils::errors::{rental_conflict_error, AppResult};

pub struct AvailabilityChecker;

impl AvailabilityChecker {
    /// Primer alquiler (menor id) que se solapa con `range` en el vehículo
    pub fn find_conflict(
        vehicle_id: i64,
        range: &DateRange,
        active_rentals: &[Rental],
        exclude_rental_id: Option<i64>,
    ) -> Option<i64> {
        active_rentals
            .iter()
            .filter(|r| r.vehicle_id == vehicle_id && r.status.is_active())
            .filter(|r| Some(r.rental_id) != exclude_rental_id)
            .filter(|r| r.range().overlaps(range))
            .map(|r| r.rental_id)
            .min()
    }

    /// Igual que `find_conflict` pero devolviendo `Conflict` si hay solapamiento
    pub fn ensure_available(
        vehicle_id: i64,
        range: &DateRange,
        active_rentals: &[Rental],
        exclude_rental_id: Option<i64>,
    ) -> AppResult<()> {
        match Self::find_conflict(vehicle_id, range, active_rentals, exclude_rental_id) {
            Some(conflicting_id) => Err(rental_conflict_error(conflicting_id)),
            None => Ok(()),
        }
    }
}
