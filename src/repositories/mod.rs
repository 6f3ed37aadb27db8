//! Repositorios
//!
//! `EntityStore` es la frontera con el almacenamiento relacional. Las
//! operaciones que comprueban y escriben lo hacen dentro de un `StoreTx`:
//! todo lo que se escribe en él se confirma junto en `commit` y se
//! descarta si la transacción se suelta sin confirmar.

use async_trait::async_trait;

use crate::models::{
    employee::Employee,
    payment::{NewPayment, Payment},
    rental::{NewRental, Rental, RentalStatus},
    renter::Renter,
    vehicle::{Vehicle, VehicleData, VehicleStatus},
};
use crate::utils::errors::AppResult;

pub mod employee_repository;
pub mod payment_repository;
pub mod pg_store;
pub mod rental_repository;
pub mod renter_repository;
pub mod vehicle_repository;

#[cfg(test)]
pub mod memory_store;

pub use pg_store::PgEntityStore;

/// Filtros para listados de alquileres
#[derive(Debug, Clone, Default)]
pub struct RentalFilter {
    pub renter_id: Option<i64>,
    pub vehicle_id: Option<i64>,
    pub statuses: Option<Vec<RentalStatus>>,
}

impl RentalFilter {
    pub fn with_statuses(statuses: &[RentalStatus]) -> Self {
        Self {
            statuses: Some(statuses.to_vec()),
            ..Self::default()
        }
    }
}

/// Lecturas sueltas y apertura de transacciones
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Abrir una transacción con espera de locks acotada
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>>;

    async fn find_rental(&self, rental_id: i64) -> AppResult<Option<Rental>>;

    /// Alquileres que cumplen el filtro, ordenados por rental_id
    async fn list_rentals(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>>;

    async fn find_renter_by_email(&self, email: &str) -> AppResult<Option<Renter>>;

    async fn find_employee_by_username(&self, username: &str) -> AppResult<Option<Employee>>;

    async fn find_vehicle(&self, vehicle_id: i64) -> AppResult<Option<Vehicle>>;

    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>>;

    /// Purga administrativa de alquileres en estado final
    async fn purge_terminal_rentals(&self) -> AppResult<u64>;
}

/// Unidad de trabajo atómica sobre el almacenamiento
#[async_trait]
pub trait StoreTx: Send {
    async fn find_rental(&mut self, rental_id: i64) -> AppResult<Option<Rental>>;

    /// Leer el alquiler bloqueando su fila hasta el commit
    async fn lock_rental(&mut self, rental_id: i64) -> AppResult<Option<Rental>>;

    /// Leer el vehículo bloqueando su fila hasta el commit. Toda
    /// comprobación de solapamiento seguida de escritura pasa por aquí.
    async fn lock_vehicle(&mut self, vehicle_id: i64) -> AppResult<Option<Vehicle>>;

    async fn find_renter(&mut self, renter_id: i64) -> AppResult<Option<Renter>>;

    async fn find_employee(&mut self, employee_id: i64) -> AppResult<Option<Employee>>;

    /// Alquileres activos del vehículo, ordenados por rental_id
    async fn active_rentals_for_vehicle(&mut self, vehicle_id: i64) -> AppResult<Vec<Rental>>;

    async fn insert_rental(&mut self, rental: &NewRental) -> AppResult<Rental>;

    /// Reescribe todas las columnas mutables del alquiler
    async fn save_rental(&mut self, rental: &Rental) -> AppResult<Rental>;

    async fn delete_rental(&mut self, rental_id: i64) -> AppResult<()>;

    async fn set_vehicle_status(&mut self, vehicle_id: i64, status: VehicleStatus) -> AppResult<()>;

    async fn insert_vehicle(&mut self, data: &VehicleData) -> AppResult<Vehicle>;

    async fn save_vehicle(&mut self, vehicle_id: i64, data: &VehicleData) -> AppResult<Vehicle>;

    async fn delete_vehicle(&mut self, vehicle_id: i64) -> AppResult<()>;

    async fn plate_number_taken(
        &mut self,
        plate_number: &str,
        exclude_vehicle_id: Option<i64>,
    ) -> AppResult<bool>;

    async fn insert_payment(&mut self, payment: &NewPayment) -> AppResult<Payment>;

    async fn commit(self: Box<Self>) -> AppResult<()>;
}
