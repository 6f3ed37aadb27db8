//! Máquina de estados del alquiler
//!
//! `plan_transition` decide, sin tocar el almacenamiento, el nuevo
//! registro del alquiler y el efecto sobre el estado del vehículo. El
//! servicio de ciclo de vida escribe ambos en la misma transacción.
//!
//! ```text
//! approve: pending                  -> approved   (vehículo: reserved)
//! reject:  pending                  -> rejected
//! cancel:  pending | approved       -> cancelled  (vehículo: available si nadie más lo retiene)
//! pay:     approved                 -> paid
//! return:  approved | paid | rented -> returned   (vehículo: available)
//! ```

use std::fmt;

use crate::models::rental::{Rental, RentalStatus};
use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::services::availability_service::AvailabilityChecker;
use crate::utils::errors::{invalid_state_error, AppResult};

/// Eventos que mueven un alquiler existente
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RentalEvent {
    Approve { approver_id: Option<i64> },
    Reject,
    Cancel,
    Pay,
    Return,
}

impl RentalEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RentalEvent::Approve { .. } => "approve",
            RentalEvent::Reject => "reject",
            RentalEvent::Cancel => "cancel",
            RentalEvent::Pay => "pay",
            RentalEvent::Return => "return",
        }
    }
}

impl fmt::Display for RentalEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resultado de una transición: alquiler nuevo y, si cambia, estado del vehículo
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionPlan {
    pub rental: Rental,
    pub vehicle_status: Option<VehicleStatus>,
}

/// Decide la transición de `rental` ante `event`.
///
/// `vehicle_active_rentals` son los alquileres activos del vehículo leídos
/// con el vehículo bloqueado; approve los usa para comprobar solapamientos
/// y cancel para saber si otro alquiler sigue reteniendo el vehículo.
pub fn plan_transition(
    rental: &Rental,
    vehicle: &Vehicle,
    event: RentalEvent,
    vehicle_active_rentals: &[Rental],
) -> AppResult<TransitionPlan> {
    let mut next = rental.clone();

    let vehicle_status = match event {
        RentalEvent::Approve { approver_id } => {
            require(rental, &[RentalStatus::Pending], event)?;
            AvailabilityChecker::ensure_available(
                rental.vehicle_id,
                &rental.range(),
                vehicle_active_rentals,
                Some(rental.rental_id),
            )?;
            next.status = RentalStatus::Approved;
            next.approved_by_id = approver_id;
            Some(VehicleStatus::Reserved)
        }
        RentalEvent::Reject => {
            require(rental, &[RentalStatus::Pending], event)?;
            next.status = RentalStatus::Rejected;
            next.approved_by_id = None;
            None
        }
        RentalEvent::Cancel => {
            require(rental, &[RentalStatus::Pending, RentalStatus::Approved], event)?;
            next.status = RentalStatus::Cancelled;

            let other_holding = vehicle_active_rentals
                .iter()
                .any(|r| r.rental_id != rental.rental_id && r.status.is_holding());
            let releases_vehicle = rental.status == RentalStatus::Approved
                && vehicle.status == VehicleStatus::Reserved
                && !other_holding;
            releases_vehicle.then_some(VehicleStatus::Available)
        }
        RentalEvent::Pay => {
            require(rental, &[RentalStatus::Approved], event)?;
            next.status = RentalStatus::Paid;
            None
        }
        RentalEvent::Return => {
            require(rental, &RentalStatus::HOLDING, event)?;
            next.status = RentalStatus::Returned;
            Some(VehicleStatus::Available)
        }
    };

    Ok(TransitionPlan {
        rental: next,
        vehicle_status,
    })
}

fn require(rental: &Rental, allowed: &[RentalStatus], event: RentalEvent) -> AppResult<()> {
    if allowed.contains(&rental.status) {
        return Ok(());
    }
    let expected = allowed
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" or ");
    Err(invalid_state_error(&format!(
        "Cannot {} a rental in status '{}' (expected {})",
        event, rental.status, expected
    )))
}
