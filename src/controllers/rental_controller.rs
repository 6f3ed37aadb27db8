use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::dto::rental_dto::{CreateRentalRequest, RentalListQuery, UpdateRentalRequest};
use crate::models::auth::{AuthenticatedUser, UserRole};
use crate::models::rental::{checked_total_cost, DateRange, NewRental, Rental, RentalStatus};
use crate::repositories::{EntityStore, RentalFilter};
use crate::services::availability_service::AvailabilityChecker;
use crate::services::rental_lifecycle_service::{
    lock_rental_and_vehicle, lock_vehicles_in_order, with_operation_timeout,
};
use crate::utils::errors::{
    forbidden_error, invalid_state_error, not_found_error, validation_error, AppError, AppResult,
};

/// CRUD de alquileres fuera de las transiciones del ciclo de vida.
/// Las escrituras comparten el `operation_timeout` del ciclo de vida.
pub struct RentalController {
    store: Arc<dyn EntityStore>,
    operation_timeout: Duration,
}

impl RentalController {
    pub fn new(store: Arc<dyn EntityStore>, operation_timeout: Duration) -> Self {
        Self {
            store,
            operation_timeout,
        }
    }

    /// Listado: el renter solo ve los suyos, los empleados todos
    pub async fn list(&self, user: &AuthenticatedUser, query: RentalListQuery) -> AppResult<Vec<Rental>> {
        let mut filter = RentalFilter {
            vehicle_id: query.vehicle_id,
            ..RentalFilter::default()
        };
        if let Some(status) = query.status.as_deref() {
            let status = RentalStatus::from_str(status)
                .map_err(|_| validation_error("status", "unknown rental status"))?;
            filter.statuses = Some(vec![status]);
        }

        if user.role == UserRole::Renter {
            match self.store.find_renter_by_email(&user.email).await? {
                Some(renter) => filter.renter_id = Some(renter.renter_id),
                None => return Ok(Vec::new()),
            }
        }

        self.store.list_rentals(&filter).await
    }

    pub async fn get_by_id(&self, user: &AuthenticatedUser, rental_id: i64) -> AppResult<Rental> {
        let rental = self
            .store
            .find_rental(rental_id)
            .await?
            .ok_or_else(|| not_found_error("Rental", rental_id))?;

        if user.role == UserRole::Renter {
            let owns = self
                .store
                .find_renter_by_email(&user.email)
                .await?
                .map_or(false, |renter| rental.is_owned_by(renter.renter_id));
            if !owns {
                return Err(forbidden_error("view rental", "rental belongs to another renter"));
            }
        }

        Ok(rental)
    }

    /// Alta directa en `pending`; no consulta el estado del vehículo
    pub async fn create(&self, request: CreateRentalRequest) -> AppResult<Rental> {
        with_operation_timeout("create", self.operation_timeout, self.create_tx(request)).await
    }

    /// Edición parcial. Los alquileres finales no se editan y el vehículo
    /// solo se reasigna mientras el alquiler está pendiente.
    pub async fn update(&self, rental_id: i64, request: UpdateRentalRequest) -> AppResult<Rental> {
        with_operation_timeout("update", self.operation_timeout, self.update_tx(rental_id, request))
            .await
    }

    /// Borrado de un alquiler en estado final
    pub async fn delete(&self, rental_id: i64) -> AppResult<()> {
        with_operation_timeout("delete", self.operation_timeout, self.delete_tx(rental_id)).await
    }

    async fn create_tx(&self, request: CreateRentalRequest) -> AppResult<Rental> {
        let range = DateRange::new(request.start_date, request.end_date)?;

        let mut tx = self.store.begin().await?;
        tx.find_renter(request.renter_id)
            .await?
            .ok_or_else(|| not_found_error("Renter", request.renter_id))?;
        let vehicle = tx
            .lock_vehicle(request.vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", request.vehicle_id))?;

        let active = tx.active_rentals_for_vehicle(vehicle.vehicle_id).await?;
        AvailabilityChecker::ensure_available(vehicle.vehicle_id, &range, &active, None)?;

        let total_cost = match request.total_cost {
            Some(total_cost) => total_cost,
            None => checked_total_cost(vehicle.price_per_day, &range)?,
        };
        let rental = tx
            .insert_rental(&NewRental {
                renter_id: request.renter_id,
                vehicle_id: vehicle.vehicle_id,
                range,
                total_cost,
            })
            .await?;
        tx.commit().await?;

        info!(
            "📝 Alquiler {} creado por personal: vehículo {}, {}..{}",
            rental.rental_id, rental.vehicle_id, rental.start_date, rental.end_date
        );
        Ok(rental)
    }

    async fn update_tx(&self, rental_id: i64, request: UpdateRentalRequest) -> AppResult<Rental> {
        let mut tx = self.store.begin().await?;

        let seen = tx
            .find_rental(rental_id)
            .await?
            .ok_or_else(|| not_found_error("Rental", rental_id))?;
        let target_vehicle_id = request.vehicle_id.unwrap_or(seen.vehicle_id);

        lock_vehicles_in_order(tx.as_mut(), &[seen.vehicle_id, target_vehicle_id]).await?;
        let rental = tx
            .lock_rental(rental_id)
            .await?
            .ok_or_else(|| not_found_error("Rental", rental_id))?;
        if rental.vehicle_id != seen.vehicle_id {
            return Err(AppError::Busy("Rental was modified concurrently, retry".to_string()));
        }

        if rental.status.is_terminal() {
            return Err(invalid_state_error(&format!(
                "Cannot edit a rental in final status '{}'",
                rental.status
            )));
        }
        let vehicle_changed = target_vehicle_id != rental.vehicle_id;
        if vehicle_changed && rental.status != RentalStatus::Pending {
            return Err(invalid_state_error(
                "The vehicle can only be reassigned while the rental is pending",
            ));
        }

        if let Some(renter_id) = request.renter_id {
            tx.find_renter(renter_id)
                .await?
                .ok_or_else(|| not_found_error("Renter", renter_id))?;
        }
        if let Some(employee_id) = request.approved_by_id {
            tx.find_employee(employee_id)
                .await?
                .ok_or_else(|| not_found_error("Employee", employee_id))?;
        }

        let range = DateRange::new(
            request.start_date.unwrap_or(rental.start_date),
            request.end_date.unwrap_or(rental.end_date),
        )?;
        let dates_changed = range != rental.range();
        if vehicle_changed || dates_changed {
            let active = tx.active_rentals_for_vehicle(target_vehicle_id).await?;
            AvailabilityChecker::ensure_available(target_vehicle_id, &range, &active, Some(rental_id))?;
        }

        let mut next = rental.clone();
        next.renter_id = request.renter_id.unwrap_or(rental.renter_id);
        next.vehicle_id = target_vehicle_id;
        next.approved_by_id = request.approved_by_id.or(rental.approved_by_id);
        next.start_date = range.start();
        next.end_date = range.end();
        if let Some(total_cost) = request.total_cost {
            next.total_cost = total_cost;
        }

        let saved = tx.save_rental(&next).await?;
        tx.commit().await?;

        info!("✏️ Alquiler {} actualizado", rental_id);
        Ok(saved)
    }

    async fn delete_tx(&self, rental_id: i64) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        let (rental, _) = lock_rental_and_vehicle(tx.as_mut(), rental_id).await?;

        if !rental.status.is_terminal() {
            return Err(invalid_state_error(&format!(
                "Only returned, rejected or cancelled rentals can be deleted (status '{}')",
                rental.status
            )));
        }

        tx.delete_rental(rental_id).await?;
        tx.commit().await?;

        info!("🗑️ Alquiler {} eliminado", rental_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vehicle::VehicleStatus;
    use crate::repositories::memory_store::MemoryStore;
    use crate::repositories::EntityStore;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn controller(store: &MemoryStore) -> RentalController {
        RentalController::new(Arc::new(store.clone()), Duration::from_secs(5))
    }

    fn user(email: &str, role: UserRole) -> AuthenticatedUser {
        AuthenticatedUser {
            user_id: "1".to_string(),
            email: email.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_renter_sees_only_own_rentals() {
        let store = MemoryStore::new();
        let ana = store.seed_renter("Ana", "ana@example.com").await;
        let bob = store.seed_renter("Bob", "bob@example.com").await;
        let vehicle = store.seed_vehicle("10.00", VehicleStatus::Available).await;
        let own = store
            .seed_rental(ana.renter_id, vehicle.vehicle_id, date("2024-01-01"), date("2024-01-02"), RentalStatus::Pending)
            .await;
        let foreign = store
            .seed_rental(bob.renter_id, vehicle.vehicle_id, date("2024-02-01"), date("2024-02-02"), RentalStatus::Pending)
            .await;
        let controller = controller(&store);

        let listed = controller
            .list(&user("ana@example.com", UserRole::Renter), RentalListQuery::default())
            .await
            .unwrap();
        assert_eq!(listed.iter().map(|r| r.rental_id).collect::<Vec<_>>(), vec![own.rental_id]);

        let all = controller
            .list(&user("boss@example.com", UserRole::Manager), RentalListQuery::default())
            .await
            .unwrap();
        assert_eq!(all.len(), 2);

        let nobody = controller
            .list(&user("ghost@example.com", UserRole::Renter), RentalListQuery::default())
            .await
            .unwrap();
        assert!(nobody.is_empty());

        let err = controller
            .get_by_id(&user("ana@example.com", UserRole::Renter), foreign.rental_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_direct_create_ignores_vehicle_status_but_checks_overlap() {
        let store = MemoryStore::new();
        let renter = store.seed_renter("Ana", "ana@example.com").await;
        let vehicle = store.seed_vehicle("99.99", VehicleStatus::Maintenance).await;
        let controller = controller(&store);
        let request = |start: &str, end: &str, total_cost: Option<Decimal>| CreateRentalRequest {
            renter_id: renter.renter_id,
            vehicle_id: vehicle.vehicle_id,
            start_date: date(start),
            end_date: date(end),
            total_cost,
        };

        let rental = controller.create(request("2024-03-01", "2024-03-02", None)).await.unwrap();
        assert_eq!(rental.status, RentalStatus::Pending);
        assert_eq!(rental.total_cost, Decimal::new(19998, 2));

        let err = controller
            .create(request("2024-03-02", "2024-03-04", Some(Decimal::new(5000, 2))))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { conflicting_rental_id: Some(id), .. } if id == rental.rental_id));

        let fixed = controller
            .create(request("2024-03-03", "2024-03-04", Some(Decimal::new(5000, 2))))
            .await
            .unwrap();
        assert_eq!(fixed.total_cost, Decimal::new(5000, 2));
    }

    #[tokio::test]
    async fn test_update_rules() {
        let store = MemoryStore::new();
        let renter = store.seed_renter("Ana", "ana@example.com").await;
        let car = store.seed_vehicle("10.00", VehicleStatus::Available).await;
        let van = store.seed_vehicle("20.00", VehicleStatus::Available).await;
        let pending = store
            .seed_rental(renter.renter_id, car.vehicle_id, date("2024-04-01"), date("2024-04-03"), RentalStatus::Pending)
            .await;
        let on_van = store
            .seed_rental(renter.renter_id, van.vehicle_id, date("2024-04-02"), date("2024-04-02"), RentalStatus::Approved)
            .await;
        let done = store
            .seed_rental(renter.renter_id, car.vehicle_id, date("2024-01-01"), date("2024-01-02"), RentalStatus::Returned)
            .await;
        let controller = controller(&store);

        // Reasignar a un vehículo ocupado en esas fechas
        let err = controller
            .update(pending.rental_id, UpdateRentalRequest { vehicle_id: Some(van.vehicle_id), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict { conflicting_rental_id: Some(id), .. } if id == on_van.rental_id));

        // Mover solo fechas sin tocar el coste
        let moved = controller
            .update(
                pending.rental_id,
                UpdateRentalRequest { start_date: Some(date("2024-04-02")), ..Default::default() },
            )
            .await
            .unwrap();
        assert_eq!(moved.start_date, date("2024-04-02"));
        assert_eq!(moved.total_cost, pending.total_cost);

        let err = controller
            .update(pending.rental_id, UpdateRentalRequest { end_date: Some(date("2024-03-01")), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = controller
            .update(on_van.rental_id, UpdateRentalRequest { vehicle_id: Some(car.vehicle_id), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let err = controller
            .update(done.rental_id, UpdateRentalRequest { total_cost: Some(Decimal::ONE), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidState(_)));

        let err = controller
            .update(pending.rental_id, UpdateRentalRequest { approved_by_id: Some(777), ..Default::default() })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_only_terminal() {
        let store = MemoryStore::new();
        let renter = store.seed_renter("Ana", "ana@example.com").await;
        let vehicle = store.seed_vehicle("10.00", VehicleStatus::Available).await;
        let active = store
            .seed_rental(renter.renter_id, vehicle.vehicle_id, date("2024-04-01"), date("2024-04-03"), RentalStatus::Pending)
            .await;
        let rejected = store
            .seed_rental(renter.renter_id, vehicle.vehicle_id, date("2024-04-01"), date("2024-04-03"), RentalStatus::Rejected)
            .await;
        let controller = controller(&store);

        assert!(matches!(controller.delete(active.rental_id).await, Err(AppError::InvalidState(_))));
        controller.delete(rejected.rental_id).await.unwrap();
        assert!(!store.snapshot().await.rentals.contains_key(&rejected.rental_id));
    }

    #[tokio::test]
    async fn test_writes_are_bounded_by_operation_timeout() {
        let store = MemoryStore::with_lock_timeout(Duration::from_secs(10));
        let renter = store.seed_renter("Ana", "ana@example.com").await;
        let vehicle = store.seed_vehicle("10.00", VehicleStatus::Available).await;
        let done = store
            .seed_rental(renter.renter_id, vehicle.vehicle_id, date("2024-01-01"), date("2024-01-02"), RentalStatus::Returned)
            .await;
        let controller = RentalController::new(Arc::new(store.clone()), Duration::from_millis(50));

        let held = store.begin().await.unwrap();
        let create = CreateRentalRequest {
            renter_id: renter.renter_id,
            vehicle_id: vehicle.vehicle_id,
            start_date: date("2024-05-01"),
            end_date: date("2024-05-02"),
            total_cost: None,
        };
        assert!(matches!(controller.create(create).await, Err(AppError::Busy(_))));
        assert!(matches!(
            controller.update(done.rental_id, UpdateRentalRequest::default()).await,
            Err(AppError::Busy(_))
        ));
        assert!(matches!(controller.delete(done.rental_id).await, Err(AppError::Busy(_))));
        drop(held);

        controller.delete(done.rental_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_create_rejects_total_cost_beyond_column() {
        let store = MemoryStore::new();
        let renter = store.seed_renter("Ana", "ana@example.com").await;
        let vehicle = store.seed_vehicle("50000.00", VehicleStatus::Available).await;

        let err = controller(&store)
            .create(CreateRentalRequest {
                renter_id: renter.renter_id,
                vehicle_id: vehicle.vehicle_id,
                start_date: date("2024-01-01"),
                end_date: date("2029-12-31"),
                total_cost: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(store.snapshot().await.rentals.is_empty());
    }
}
