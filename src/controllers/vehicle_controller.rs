use std::sync::Arc;

use tracing::info;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleListQuery};
use crate::models::vehicle::{Vehicle, VehicleData, VehicleStatus};
use crate::repositories::EntityStore;
use crate::utils::errors::{conflict_error, not_found_error, validation_error, AppError, AppResult};

/// Parseo del estado de vehículo que llega en requests
pub fn parse_vehicle_status(value: &str) -> AppResult<VehicleStatus> {
    VehicleStatus::parse_lenient(value).ok_or_else(|| {
        validation_error(
            "status",
            "status must be one of available, reserved, rented, maintenance",
        )
    })
}

pub struct VehicleController {
    store: Arc<dyn EntityStore>,
}

impl VehicleController {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, query: VehicleListQuery) -> AppResult<Vec<Vehicle>> {
        let status = query
            .status
            .as_deref()
            .map(parse_vehicle_status)
            .transpose()?;
        self.store.list_vehicles(status).await
    }

    pub async fn get_by_id(&self, vehicle_id: i64) -> AppResult<Vehicle> {
        self.store
            .find_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))
    }

    pub async fn create(&self, request: CreateVehicleRequest) -> AppResult<Vehicle> {
        let status = match request.status.as_deref() {
            Some(value) => parse_vehicle_status(value)?,
            None => VehicleStatus::Available,
        };
        let data = VehicleData {
            vehicle_type: request.vehicle_type.trim().to_string(),
            model: request.model.trim().to_string(),
            plate_number: request.plate_number.trim().to_string(),
            price_per_day: request.price_per_day,
            status,
        };

        let mut tx = self.store.begin().await?;
        if tx.plate_number_taken(&data.plate_number, None).await? {
            return Err(conflict_error("Vehicle", "plate_number", &data.plate_number));
        }
        let vehicle = tx.insert_vehicle(&data).await?;
        tx.commit().await?;

        info!("🚗 Vehículo {} creado ({})", vehicle.vehicle_id, vehicle.plate_number);
        Ok(vehicle)
    }

    pub async fn update(&self, vehicle_id: i64, request: UpdateVehicleRequest) -> AppResult<Vehicle> {
        let mut tx = self.store.begin().await?;
        let current = tx
            .lock_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;

        let mut data = VehicleData::from(&current);
        if let Some(vehicle_type) = request.vehicle_type {
            data.vehicle_type = vehicle_type.trim().to_string();
        }
        if let Some(model) = request.model {
            data.model = model.trim().to_string();
        }
        if let Some(plate_number) = request.plate_number {
            data.plate_number = plate_number.trim().to_string();
        }
        if let Some(price_per_day) = request.price_per_day {
            data.price_per_day = price_per_day;
        }
        if let Some(status) = request.status.as_deref() {
            data.status = parse_vehicle_status(status)?;
        }

        if tx.plate_number_taken(&data.plate_number, Some(vehicle_id)).await? {
            return Err(conflict_error("Vehicle", "plate_number", &data.plate_number));
        }
        let vehicle = tx.save_vehicle(vehicle_id, &data).await?;
        tx.commit().await?;

        info!("✏️ Vehículo {} actualizado", vehicle_id);
        Ok(vehicle)
    }

    pub async fn update_status(&self, vehicle_id: i64, status: &str) -> AppResult<Vehicle> {
        let status = parse_vehicle_status(status)?;

        let mut tx = self.store.begin().await?;
        let mut vehicle = tx
            .lock_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;
        tx.set_vehicle_status(vehicle_id, status).await?;
        tx.commit().await?;

        info!("🚗 Vehículo {}: {} -> {}", vehicle_id, vehicle.status, status);
        vehicle.status = status;
        Ok(vehicle)
    }

    /// Borra el vehículo si ningún alquiler activo lo referencia
    pub async fn delete(&self, vehicle_id: i64) -> AppResult<()> {
        let mut tx = self.store.begin().await?;
        tx.lock_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| not_found_error("Vehicle", vehicle_id))?;

        let active = tx.active_rentals_for_vehicle(vehicle_id).await?;
        if let Some(first) = active.first() {
            return Err(AppError::Conflict {
                message: format!(
                    "Vehicle {} has {} active rental(s) and cannot be deleted",
                    vehicle_id,
                    active.len()
                ),
                conflicting_rental_id: Some(first.rental_id),
            });
        }

        tx.delete_vehicle(vehicle_id).await?;
        tx.commit().await?;

        info!("🗑️ Vehículo {} eliminado", vehicle_id);
        Ok(())
    }
}
