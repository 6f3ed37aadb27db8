//! Servicio de ciclo de vida de alquileres
//!
//! Cada operación corre en una única transacción del `EntityStore`:
//! se bloquea primero la fila del vehículo, después la del alquiler, se
//! leen los alquileres activos del vehículo, se decide la transición con
//! `plan_transition` y se escriben alquiler y vehículo juntos. Cualquier
//! error antes del `commit` descarta la transacción entera.
//!
//! La operación completa está acotada por `operation_timeout`; al
//! vencer se devuelve `Busy` y el cliente puede reintentar.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::models::{
    auth::AuthenticatedUser,
    payment::{NewPayment, PaymentReceipt, DEFAULT_PAYMENT_METHOD},
    rental::{checked_total_cost, DateRange, NewRental, Rental},
    renter::Renter,
    vehicle::Vehicle,
};
use crate::repositories::{EntityStore, StoreTx};
use crate::services::availability_service::AvailabilityChecker;
use crate::services::rental_transitions::{plan_transition, RentalEvent, TransitionPlan};
use crate::utils::errors::{
    field_validation_error, forbidden_error, not_found_error, AppError, AppResult,
};
use crate::utils::validation::validate_amount;

#[derive(Clone)]
pub struct RentalLifecycleService {
    store: Arc<dyn EntityStore>,
    operation_timeout: Duration,
}

impl RentalLifecycleService {
    pub fn new(store: Arc<dyn EntityStore>, operation_timeout: Duration) -> Self {
        Self {
            store,
            operation_timeout,
        }
    }

    /// Perfil de renter del usuario autenticado (por email)
    pub async fn renter_for(&self, user: &AuthenticatedUser) -> AppResult<Renter> {
        self.store
            .find_renter_by_email(&user.email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No renter profile for '{}'", user.email)))
    }

    /// Empleado que aprueba: username = parte local del email
    pub async fn approver_for(&self, user: &AuthenticatedUser) -> AppResult<Option<i64>> {
        match self.store.find_employee_by_username(user.username()).await? {
            Some(employee) => Ok(Some(employee.employee_id)),
            None => {
                warn!(
                    "⚠️ No hay empleado con username '{}', se aprueba sin approved_by",
                    user.username()
                );
                Ok(None)
            }
        }
    }

    /// Solicitud de un renter: crea el alquiler en `pending`
    pub async fn request_rental(
        &self,
        renter_id: i64,
        vehicle_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> AppResult<Rental> {
        let range = DateRange::new(start_date, end_date)?;
        self.bounded("request", self.request_rental_tx(renter_id, vehicle_id, range))
            .await
    }

    pub async fn approve(&self, rental_id: i64, approver_id: Option<i64>) -> AppResult<Rental> {
        self.bounded(
            "approve",
            self.transition(rental_id, RentalEvent::Approve { approver_id }, None),
        )
        .await
    }

    pub async fn reject(&self, rental_id: i64) -> AppResult<Rental> {
        self.bounded("reject", self.transition(rental_id, RentalEvent::Reject, None))
            .await
    }

    /// Cancelación por el renter dueño del alquiler
    pub async fn cancel(&self, renter_id: i64, rental_id: i64) -> AppResult<Rental> {
        self.bounded(
            "cancel",
            self.transition(rental_id, RentalEvent::Cancel, Some(renter_id)),
        )
        .await
    }

    /// Pago del renter dueño; importe por defecto = total_cost
    pub async fn pay(
        &self,
        rental_id: i64,
        renter_id: i64,
        amount: Option<Decimal>,
        method: Option<String>,
    ) -> AppResult<PaymentReceipt> {
        self.bounded("pay", self.pay_tx(rental_id, renter_id, amount, method))
            .await
    }

    pub async fn mark_returned(&self, rental_id: i64) -> AppResult<Rental> {
        self.bounded("return", self.transition(rental_id, RentalEvent::Return, None))
            .await
    }

    async fn bounded<T>(
        &self,
        operation: &'static str,
        future: impl Future<Output = AppResult<T>>,
    ) -> AppResult<T> {
        with_operation_timeout(operation, self.operation_timeout, future).await
    }

    async fn request_rental_tx(
        &self,
        renter_id: i64,
        vehicle_id: i64,
        range: DateRange,
    ) -> AppResult<Rental> {
        let mut tx = self.store.begin().await?;

        tx.find_renter(renter_id)
            .await?
            .ok_or_else(|| not_found_error("Renter", renter_id))?;
        let vehicle = tx
            .lock_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;

        if !vehicle.status.accepts_requests() {
            return Err(AppError::Conflict {
                message: format!("Vehicle is not available (status '{}')", vehicle.status),
                conflicting_rental_id: None,
            });
        }

        let active = tx.active_rentals_for_vehicle(vehicle_id).await?;
        AvailabilityChecker::ensure_available(vehicle_id, &range, &active, None)?;

        let rental = tx
            .insert_rental(&NewRental {
                renter_id,
                vehicle_id,
                range,
                total_cost: checked_total_cost(vehicle.price_per_day, &range)?,
            })
            .await?;
        tx.commit().await?;

        info!(
            "📝 Alquiler {} solicitado: vehículo {}, {}..{}, total {}",
            rental.rental_id, vehicle_id, rental.start_date, rental.end_date, rental.total_cost
        );
        Ok(rental)
    }

    async fn transition(
        &self,
        rental_id: i64,
        event: RentalEvent,
        owner: Option<i64>,
    ) -> AppResult<Rental> {
        let mut tx = self.store.begin().await?;
        let (before, plan) = plan_locked(tx.as_mut(), rental_id, event, owner).await?;
        let rental = apply_plan(tx.as_mut(), &plan).await?;
        tx.commit().await?;

        log_transition(&before, &plan, event);
        Ok(rental)
    }

    async fn pay_tx(
        &self,
        rental_id: i64,
        renter_id: i64,
        amount: Option<Decimal>,
        method: Option<String>,
    ) -> AppResult<PaymentReceipt> {
        let mut tx = self.store.begin().await?;
        let (before, plan) = plan_locked(tx.as_mut(), rental_id, RentalEvent::Pay, Some(renter_id)).await?;

        let amount = amount.unwrap_or(before.total_cost);
        validate_amount(&amount).map_err(|e| field_validation_error("amount", e))?;
        let method = method
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string());

        let rental = apply_plan(tx.as_mut(), &plan).await?;
        let payment = tx
            .insert_payment(&NewPayment {
                rental_id,
                amount,
                method,
            })
            .await?;
        tx.commit().await?;

        log_transition(&before, &plan, RentalEvent::Pay);
        info!("💳 Pago {} registrado: {} vía {:?}", payment.payment_id, payment.amount, payment.method);
        Ok(PaymentReceipt { payment, rental })
    }
}

/// Acota una operación completa; al vencer devuelve `Busy`
pub(crate) async fn with_operation_timeout<T>(
    operation: &'static str,
    operation_timeout: Duration,
    future: impl Future<Output = AppResult<T>>,
) -> AppResult<T> {
    match tokio::time::timeout(operation_timeout, future).await {
        Ok(result) => result,
        Err(_) => {
            warn!(
                "⏱️ La operación '{}' superó {:?}, se descarta",
                operation, operation_timeout
            );
            Err(AppError::Busy(format!(
                "Operation '{}' timed out waiting for locks, retry",
                operation
            )))
        }
    }
}

/// Bloquea vehículo y alquiler en ese orden y planifica la transición
async fn plan_locked(
    tx: &mut dyn StoreTx,
    rental_id: i64,
    event: RentalEvent,
    owner: Option<i64>,
) -> AppResult<(Rental, TransitionPlan)> {
    let (rental, vehicle) = lock_rental_and_vehicle(tx, rental_id).await?;

    if let Some(renter_id) = owner {
        if !rental.is_owned_by(renter_id) {
            return Err(forbidden_error(event.name(), "rental belongs to another renter"));
        }
    }

    let active = tx.active_rentals_for_vehicle(vehicle.vehicle_id).await?;
    let plan = plan_transition(&rental, &vehicle, event, &active)?;
    Ok((rental, plan))
}

/// Lee el alquiler, bloquea su vehículo y luego el propio alquiler.
///
/// Si entre la lectura y el bloqueo el alquiler cambió de vehículo, el
/// lock tomado ya no es el correcto y se devuelve `Busy`.
pub(crate) async fn lock_rental_and_vehicle(
    tx: &mut dyn StoreTx,
    rental_id: i64,
) -> AppResult<(Rental, Vehicle)> {
    let seen = tx
        .find_rental(rental_id)
        .await?
        .ok_or_else(|| not_found_error("Rental", rental_id))?;

    let vehicle = tx
        .lock_vehicle(seen.vehicle_id)
        .await?
        .ok_or_else(|| not_found_error("Vehicle", seen.vehicle_id))?;
    let rental = tx
        .lock_rental(rental_id)
        .await?
        .ok_or_else(|| not_found_error("Rental", rental_id))?;

    if rental.vehicle_id != vehicle.vehicle_id {
        debug!(
            "🔁 Alquiler {} reasignado del vehículo {} al {} durante el bloqueo",
            rental_id, vehicle.vehicle_id, rental.vehicle_id
        );
        return Err(AppError::Busy(
            "Rental was modified concurrently, retry".to_string(),
        ));
    }

    Ok((rental, vehicle))
}

/// Bloquea varios vehículos en orden ascendente de id
pub(crate) async fn lock_vehicles_in_order(
    tx: &mut dyn StoreTx,
    vehicle_ids: &[i64],
) -> AppResult<Vec<Vehicle>> {
    let mut ids = vehicle_ids.to_vec();
    ids.sort_unstable();
    ids.dedup();

    let mut vehicles = Vec::with_capacity(ids.len());
    for vehicle_id in ids {
        let vehicle = tx
            .lock_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;
        vehicles.push(vehicle);
    }
    Ok(vehicles)
}

async fn apply_plan(tx: &mut dyn StoreTx, plan: &TransitionPlan) -> AppResult<Rental> {
    let rental = tx.save_rental(&plan.rental).await?;
    if let Some(status) = plan.vehicle_status {
        tx.set_vehicle_status(rental.vehicle_id, status).await?;
    }
    Ok(rental)
}

fn log_transition(before: &Rental, plan: &TransitionPlan, event: RentalEvent) {
    info!(
        "🔄 Alquiler {} ({}): {} -> {} en vehículo {}",
        before.rental_id, event, before.status, plan.rental.status, before.vehicle_id
    );
    if let Some(status) = plan.vehicle_status {
        info!("🚗 Vehículo {} pasa a '{}'", before.vehicle_id, status);
    }
}
