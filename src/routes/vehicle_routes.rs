use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Extension, Json, Router,
};
use validator::Validate;

use crate::controllers::vehicle_controller::VehicleController;
use crate::dto::vehicle_dto::{
    CreateVehicleRequest, UpdateVehicleRequest, VehicleListQuery, VehicleStatusRequest,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::vehicle::Vehicle;
use crate::services::{Action, AuthorizationService};
use crate::state::AppState;
use crate::utils::extract::ApiJson;
use crate::utils::errors::AppError;

pub fn create_vehicle_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vehicles).post(create_vehicle))
        .route("/:id", get(get_vehicle).put(update_vehicle).delete(delete_vehicle))
        .route("/:id/status", patch(update_vehicle_status))
}

async fn list_vehicles(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<VehicleListQuery>,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    AuthorizationService::authorize(&user, Action::ViewVehicles)?;
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.list(query).await?))
}

async fn get_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vehicle>, AppError> {
    AuthorizationService::authorize(&user, Action::ViewVehicles)?;
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.get_by_id(id).await?))
}

async fn create_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    AuthorizationService::authorize(&user, Action::ManageVehicles)?;
    request.validate()?;
    let controller = VehicleController::new(state.store.clone());
    let vehicle = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

async fn update_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateVehicleRequest>,
) -> Result<Json<Vehicle>, AppError> {
    AuthorizationService::authorize(&user, Action::ManageVehicles)?;
    request.validate()?;
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.update(id, request).await?))
}

async fn update_vehicle_status(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<VehicleStatusRequest>,
) -> Result<Json<Vehicle>, AppError> {
    AuthorizationService::authorize(&user, Action::ManageVehicles)?;
    let controller = VehicleController::new(state.store.clone());
    Ok(Json(controller.update_status(id, &request.status).await?))
}

async fn delete_vehicle(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    AuthorizationService::authorize(&user, Action::ManageVehicles)?;
    let controller = VehicleController::new(state.store.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Vehicle {} deleted", id)
    })))
}
