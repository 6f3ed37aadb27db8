use std::sync::Arc;

use tracing::info;

use crate::models::rental::{Rental, RentalStatus};
use crate::repositories::{EntityStore, RentalFilter};
use crate::utils::errors::AppResult;

/// Listados de gestión: alquileres en curso e historial
pub struct ReportController {
    store: Arc<dyn EntityStore>,
}

impl ReportController {
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Alquileres que retienen un vehículo, los más recientes primero
    pub async fn active_rentals(&self) -> AppResult<Vec<Rental>> {
        let mut rentals = self
            .store
            .list_rentals(&RentalFilter::with_statuses(&RentalStatus::HOLDING))
            .await?;
        rentals.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.rental_id.cmp(&a.rental_id))
        });
        Ok(rentals)
    }

    /// Alquileres finalizados por fecha de fin descendente
    pub async fn rental_history(&self) -> AppResult<Vec<Rental>> {
        let mut rentals = self
            .store
            .list_rentals(&RentalFilter::with_statuses(&RentalStatus::TERMINAL))
            .await?;
        rentals.sort_by(|a, b| {
            b.end_date
                .cmp(&a.end_date)
                .then(b.rental_id.cmp(&a.rental_id))
        });
        Ok(rentals)
    }

    /// Purga administrativa del historial
    pub async fn clear_history(&self) -> AppResult<u64> {
        let deleted = self.store.purge_terminal_rentals().await?;
        info!("🧹 Historial purgado: {} alquileres eliminados", deleted);
        Ok(deleted)
    }
}
