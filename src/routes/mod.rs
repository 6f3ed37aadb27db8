//! Rutas HTTP
//!
//! Todo cuelga de `/api`. Solo `/api/ping` queda fuera del middleware
//! de autenticación.

use axum::{middleware, response::Json, routing::get, Router};
use serde_json::json;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::{auth_middleware, cors_layer};
use crate::state::AppState;

pub mod rental_routes;
pub mod report_routes;
pub mod vehicle_routes;


/// Router completo de la aplicación
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .nest("/rentals", rental_routes::create_rental_router())
        .nest("/vehicles", vehicle_routes::create_vehicle_router())
        .nest("/reports", report_routes::create_report_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let api = Router::new().route("/ping", get(ping)).merge(protected);

    Router::new()
        .nest("/api", api)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}

/// Endpoint de salud, sin autenticación
async fn ping() -> Json<serde_json::Value> {
    Json(json!({
        "message": "pong",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
