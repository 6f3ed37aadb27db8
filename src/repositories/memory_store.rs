//! EntityStore en memoria para tests
//!
//! Un único mutex asíncrono protege todas las tablas: cada transacción
//! trabaja sobre una copia y la publica en `commit`, así que las
//! transacciones son serializables y soltar una sin confirmar no deja
//! rastro. La espera por el mutex está acotada igual que el
//! `lock_timeout` de PostgreSQL.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{EntityStore, RentalFilter, StoreTx};
use crate::models::{
    employee::{Employee, EmployeeRole},
    payment::{NewPayment, Payment},
    rental::{NewRental, Rental, RentalStatus},
    renter::Renter,
    vehicle::{Vehicle, VehicleData, VehicleStatus},
};
use crate::utils::errors::{conflict_error, AppError, AppResult};

#[derive(Debug, Default, Clone)]
pub struct MemoryTables {
    pub renters: BTreeMap<i64, Renter>,
    pub employees: BTreeMap<i64, Employee>,
    pub vehicles: BTreeMap<i64, Vehicle>,
    pub rentals: BTreeMap<i64, Rental>,
    pub payments: BTreeMap<i64, Payment>,
    last_id: i64,
}

impl MemoryTables {
    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn reserve_id(&mut self, id: i64) {
        self.last_id = self.last_id.max(id);
    }

    fn active_rentals_for_vehicle(&self, vehicle_id: i64) -> Vec<Rental> {
        self.rentals
            .values()
            .filter(|r| r.vehicle_id == vehicle_id && r.status.is_active())
            .cloned()
            .collect()
    }
}

fn matches_filter(filter: &RentalFilter, rental: &Rental) -> bool {
    filter.renter_id.map_or(true, |id| rental.renter_id == id)
        && filter.vehicle_id.map_or(true, |id| rental.vehicle_id == id)
        && filter
            .statuses
            .as_ref()
            .map_or(true, |statuses| statuses.contains(&rental.status))
}

#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<MemoryTables>>,
    lock_timeout: Duration,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_lock_timeout(Duration::from_millis(500))
    }

    pub fn with_lock_timeout(lock_timeout: Duration) -> Self {
        Self {
            tables: Arc::new(Mutex::new(MemoryTables::default())),
            lock_timeout,
        }
    }

    async fn lock(&self) -> AppResult<OwnedMutexGuard<MemoryTables>> {
        tokio::time::timeout(self.lock_timeout, self.tables.clone().lock_owned())
            .await
            .map_err(|_| AppError::Busy("The vehicle is locked by another operation, retry".to_string()))
    }

    pub async fn seed_renter(&self, full_name: &str, email: &str) -> Renter {
        let mut tables = self.tables.lock().await;
        let renter_id = tables.next_id();
        let renter = Renter {
            renter_id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            phone: None,
            username: email.split('@').next().unwrap_or(email).to_string(),
            created_at: Utc::now(),
        };
        tables.renters.insert(renter_id, renter.clone());
        renter
    }

    pub async fn seed_employee(&self, username: &str, role: EmployeeRole) -> Employee {
        let mut tables = self.tables.lock().await;
        let employee_id = tables.next_id();
        let employee = Employee {
            employee_id,
            full_name: username.to_string(),
            position: None,
            role,
            username: username.to_string(),
            created_at: Utc::now(),
        };
        tables.employees.insert(employee_id, employee.clone());
        employee
    }

    pub async fn seed_vehicle(&self, price_per_day: &str, status: VehicleStatus) -> Vehicle {
        let vehicle_id = self.tables.lock().await.next_id();
        self.seed_vehicle_with_id(vehicle_id, price_per_day, status).await
    }

    pub async fn seed_vehicle_with_id(
        &self,
        vehicle_id: i64,
        price_per_day: &str,
        status: VehicleStatus,
    ) -> Vehicle {
        let mut tables = self.tables.lock().await;
        tables.reserve_id(vehicle_id);
        let now = Utc::now();
        let vehicle = Vehicle {
            vehicle_id,
            vehicle_type: "sedan".to_string(),
            model: "Corolla".to_string(),
            plate_number: format!("PLT-{:04}", vehicle_id),
            price_per_day: Decimal::from_str(price_per_day).unwrap(),
            status,
            created_at: now,
            updated_at: now,
        };
        tables.vehicles.insert(vehicle_id, vehicle.clone());
        vehicle
    }

    pub async fn seed_rental(
        &self,
        renter_id: i64,
        vehicle_id: i64,
        start_date: NaiveDate,
        end_date: NaiveDate,
        status: RentalStatus,
    ) -> Rental {
        let mut tables = self.tables.lock().await;
        let rental_id = tables.next_id();
        let now = Utc::now();
        let rental = Rental {
            rental_id,
            renter_id,
            vehicle_id,
            approved_by_id: None,
            start_date,
            end_date,
            total_cost: Decimal::ZERO,
            status,
            created_at: now,
            updated_at: now,
        };
        tables.rentals.insert(rental_id, rental.clone());
        rental
    }

    pub async fn vehicle(&self, vehicle_id: i64) -> Vehicle {
        self.tables.lock().await.vehicles[&vehicle_id].clone()
    }

    pub async fn rental(&self, rental_id: i64) -> Rental {
        self.tables.lock().await.rentals[&rental_id].clone()
    }

    pub async fn snapshot(&self) -> MemoryTables {
        self.tables.lock().await.clone()
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<MemoryTables>,
    staged: MemoryTables,
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn StoreTx>> {
        let guard = self.lock().await?;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx { guard, staged }))
    }

    async fn find_rental(&self, rental_id: i64) -> AppResult<Option<Rental>> {
        Ok(self.lock().await?.rentals.get(&rental_id).cloned())
    }

    async fn list_rentals(&self, filter: &RentalFilter) -> AppResult<Vec<Rental>> {
        let tables = self.lock().await?;
        Ok(tables
            .rentals
            .values()
            .filter(|r| matches_filter(filter, r))
            .cloned()
            .collect())
    }

    async fn find_renter_by_email(&self, email: &str) -> AppResult<Option<Renter>> {
        let tables = self.lock().await?;
        Ok(tables
            .renters
            .values()
            .find(|r| r.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_employee_by_username(&self, username: &str) -> AppResult<Option<Employee>> {
        let tables = self.lock().await?;
        Ok(tables.employees.values().find(|e| e.username == username).cloned())
    }

    async fn find_vehicle(&self, vehicle_id: i64) -> AppResult<Option<Vehicle>> {
        Ok(self.lock().await?.vehicles.get(&vehicle_id).cloned())
    }

    async fn list_vehicles(&self, status: Option<VehicleStatus>) -> AppResult<Vec<Vehicle>> {
        let tables = self.lock().await?;
        Ok(tables
            .vehicles
            .values()
            .filter(|v| status.map_or(true, |s| v.status == s))
            .cloned()
            .collect())
    }

    async fn purge_terminal_rentals(&self) -> AppResult<u64> {
        let mut tables = self.lock().await?;
        let before = tables.rentals.len();
        tables.rentals.retain(|_, r| !r.status.is_terminal());
        Ok((before - tables.rentals.len()) as u64)
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn find_rental(&mut self, rental_id: i64) -> AppResult<Option<Rental>> {
        Ok(self.staged.rentals.get(&rental_id).cloned())
    }

    async fn lock_rental(&mut self, rental_id: i64) -> AppResult<Option<Rental>> {
        Ok(self.staged.rentals.get(&rental_id).cloned())
    }

    async fn lock_vehicle(&mut self, vehicle_id: i64) -> AppResult<Option<Vehicle>> {
        Ok(self.staged.vehicles.get(&vehicle_id).cloned())
    }

    async fn find_renter(&mut self, renter_id: i64) -> AppResult<Option<Renter>> {
        Ok(self.staged.renters.get(&renter_id).cloned())
    }

    async fn find_employee(&mut self, employee_id: i64) -> AppResult<Option<Employee>> {
        Ok(self.staged.employees.get(&employee_id).cloned())
    }

    async fn active_rentals_for_vehicle(&mut self, vehicle_id: i64) -> AppResult<Vec<Rental>> {
        Ok(self.staged.active_rentals_for_vehicle(vehicle_id))
    }

    async fn insert_rental(&mut self, rental: &NewRental) -> AppResult<Rental> {
        let rental_id = self.staged.next_id();
        let now = Utc::now();
        let row = Rental {
            rental_id,
            renter_id: rental.renter_id,
            vehicle_id: rental.vehicle_id,
            approved_by_id: None,
            start_date: rental.range.start(),
            end_date: rental.range.end(),
            total_cost: rental.total_cost,
            status: RentalStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        self.staged.rentals.insert(rental_id, row.clone());
        Ok(row)
    }

    async fn save_rental(&mut self, rental: &Rental) -> AppResult<Rental> {
        let mut row = rental.clone();
        row.updated_at = Utc::now();
        self.staged.rentals.insert(row.rental_id, row.clone());
        Ok(row)
    }

    async fn delete_rental(&mut self, rental_id: i64) -> AppResult<()> {
        self.staged.rentals.remove(&rental_id);
        self.staged.payments.retain(|_, p| p.rental_id != rental_id);
        Ok(())
    }

    async fn set_vehicle_status(&mut self, vehicle_id: i64, status: VehicleStatus) -> AppResult<()> {
        if let Some(vehicle) = self.staged.vehicles.get_mut(&vehicle_id) {
            vehicle.status = status;
            vehicle.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn insert_vehicle(&mut self, data: &VehicleData) -> AppResult<Vehicle> {
        if self.plate_number_taken(&data.plate_number, None).await? {
            return Err(conflict_error("Vehicle", "plate_number", &data.plate_number));
        }
        let vehicle_id = self.staged.next_id();
        let now = Utc::now();
        let vehicle = Vehicle {
            vehicle_id,
            vehicle_type: data.vehicle_type.clone(),
            model: data.model.clone(),
            plate_number: data.plate_number.clone(),
            price_per_day: data.price_per_day,
            status: data.status,
            created_at: now,
            updated_at: now,
        };
        self.staged.vehicles.insert(vehicle_id, vehicle.clone());
        Ok(vehicle)
    }

    async fn save_vehicle(&mut self, vehicle_id: i64, data: &VehicleData) -> AppResult<Vehicle> {
        let vehicle = self
            .staged
            .vehicles
            .get_mut(&vehicle_id)
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", vehicle_id)))?;
        vehicle.vehicle_type = data.vehicle_type.clone();
        vehicle.model = data.model.clone();
        vehicle.plate_number = data.plate_number.clone();
        vehicle.price_per_day = data.price_per_day;
        vehicle.status = data.status;
        vehicle.updated_at = Utc::now();
        Ok(vehicle.clone())
    }

    async fn delete_vehicle(&mut self, vehicle_id: i64) -> AppResult<()> {
        self.staged.vehicles.remove(&vehicle_id);
        self.staged.rentals.retain(|_, r| r.vehicle_id != vehicle_id);
        Ok(())
    }

    async fn plate_number_taken(
        &mut self,
        plate_number: &str,
        exclude_vehicle_id: Option<i64>,
    ) -> AppResult<bool> {
        Ok(self.staged.vehicles.values().any(|v| {
            v.plate_number.eq_ignore_ascii_case(plate_number) && Some(v.vehicle_id) != exclude_vehicle_id
        }))
    }

    async fn insert_payment(&mut self, payment: &NewPayment) -> AppResult<Payment> {
        let payment_id = self.staged.next_id();
        let now = Utc::now();
        let row = Payment {
            payment_id,
            rental_id: payment.rental_id,
            amount: payment.amount,
            payment_date: now,
            method: Some(payment.method.clone()),
            created_at: now,
        };
        self.staged.payments.insert(payment_id, row.clone());
        Ok(row)
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let MemoryTx { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
