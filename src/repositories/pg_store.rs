//! EntityStore sobre PostgreSQL
//!
//! Cada `PgStoreTx` es una transacción de sqlx con `lock_timeout` local:
//! si el lock de un vehículo no llega a tiempo PostgreSQL devuelve 55P03
//! y la operación falla como `Busy`. Si la transacción se suelta sin
//! `commit`, sqlx hace rollback.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;

use super::{
    employee_repository, payment_repository, rental_repository, renter_repository,
    vehicle_repository, EntityStore, RentalFilter, StoreTx,
};
use crate::models::{
    employee::Employee,
    payment::{NewPayment, Payment},
    rental::{NewRental, Rental},
    renter::Renter,
    vehicle::{Vehicle, VehicleData, VehicleStatus},
};
use crate::utils::errors::AppResult;

#[derive(Clone)]
pub struct PgEntityStore {
    pool: PgPool,
    lock_timeout: Duration,
}

impl PgEntityStore {
    pub fn new(pool: PgPool, lock_timeout: Duration) -> Self {
        Self { pool, lock_timeout }
    }
}

pub struct PgStoreTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl EntityStore for PgEntityStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let mut tx = self.pool.begin().await?;

        // SET no admite parámetros; el valor sale de la configuración
        let statement = format!("SET LOCAL lock_timeout = '{}ms'", self.lock_timeout.as_millis());
        sqlx::query(&statement).execute(&mut *tx).await?;

        debug!("🔓 Transacción abierta (lock_timeout {:?})", self.lock_timeout);
        Ok(Box::new(PgStoreTx { tx }))
    }

    async fn find_rental(&self, rental_id: i64) -> AppResult<Option<Rental>> {
        rental_repository::find_by_id(&self.pool, rental_id).await
    }

    async fn list_rentals(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>> {
        rental_repository::list(&self.pool, filter).await
    }

    async fn find_renter_by_email(&self, email: &str) -> AppResult<Option<Renter>> {
        renter_repository::find_by_email(&self.pool, email).await
    }

    async fn find_employee_by_username(&self, username: &str) -> AppResult<Option<Employee>> {
        employee_repository::find_by_username(&self.pool, username).await
    }

    async fn find_vehicle(&self, vehicle_id: i64) -> AppResult<Option<Vehicle>> {
        vehicle_repository::find_by_id(&self.pool, vehicle_id).await
    }

    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        vehicle_repository::list(&self.pool, status).await
    }

    async fn purge_terminal_rentals(&self) -> AppResult<u64> {
        rental_repository::delete_terminal(&self.pool).await
    }
}

#[async_trait]
impl StoreTx for PgStoreTx {
    async fn find_rental(&mut self, rental_id: i64) -> AppResult<Option<Rental>> {
        rental_repository::find_by_id(&mut *self.tx, rental_id).await
    }

    async fn lock_rental(&mut self, rental_id: i64) -> AppResult<Option<Rental>> {
        rental_repository::find_for_update(&mut *self.tx, rental_id).await
    }

    async fn lock_vehicle(&mut self, vehicle_id: i64) -> AppResult<Option<Vehicle>> {
        vehicle_repository::find_for_update(&mut *self.tx, vehicle_id).await
    }

    async fn find_renter(&mut self, renter_id: i64) -> AppResult<Option<Renter>> {
        renter_repository::find_by_id(&mut *self.tx, renter_id).await
    }

    async fn find_employee(&mut self, employee_id: i64) -> AppResult<Option<Employee>> {
        employee_repository::find_by_id(&mut *self.tx, employee_id).await
    }

    async fn active_rentals_for_vehicle(&mut self, vehicle_id: i64) -> AppResult<Vec<Rental>> {
        rental_repository::active_for_vehicle(&mut *self.tx, vehicle_id).await
    }

    async fn insert_rental(&mut self, rental: &NewRental) -> AppResult<Rental> {
        rental_repository::insert(&mut *self.tx, rental).await
    }

    async fn save_rental(&mut self, rental: &Rental) -> AppResult<Rental> {
        rental_repository::update(&mut *self.tx, rental).await
    }

    async fn delete_rental(&mut self, rental_id: i64) -> AppResult<()> {
        rental_repository::delete(&mut *self.tx, rental_id).await
    }

    async fn set_vehicle_status(&mut self, vehicle_id: i64, status: VehicleStatus) -> AppResult<()> {
        vehicle_repository::set_status(&mut *self.tx, vehicle_id, status).await
    }

    async fn insert_vehicle(&mut self, data: &VehicleData) -> AppResult<Vehicle> {
        vehicle_repository::insert(&mut *self.tx, data).await
    }

    async fn save_vehicle(&mut self, vehicle_id: i64, data: &VehicleData) -> AppResult<Vehicle> {
        vehicle_repository::update(&mut *self.tx, vehicle_id, data).await
    }

    async fn delete_vehicle(&mut self, vehicle_id: i64) -> AppResult<()> {
        vehicle_repository::delete(&mut *self.tx, vehicle_id).await
    }

    async fn plate_number_taken(
        &mut self,
        plate_number: &str,
        exclude_vehicle_id: Option<i64>,
    ) -> AppResult<bool> {
        vehicle_repository::plate_number_exists(&mut *self.tx, plate_number, exclude_vehicle_id).await
    }

    async fn insert_payment(&mut self, payment: &NewPayment) -> AppResult<Payment> {
        payment_repository::insert(&mut *self.tx, payment).await
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
