//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::repositories::EntityStore;
use crate::services::RentalLifecycleService;
use crate::utils::jwt::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EntityStore>,
    pub lifecycle: RentalLifecycleService,
    pub config: EnvironmentConfig,
    pub jwt: JwtConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn EntityStore>, config: EnvironmentConfig) -> Self {
        let lifecycle = RentalLifecycleService::new(store.clone(), config.operation_timeout);
        let jwt = JwtConfig::from(&config);
        Self {
            store,
            lifecycle,
            config,
            jwt,
        }
    }
}
