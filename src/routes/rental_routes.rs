use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::controllers::rental_controller::RentalController;
use crate::dto::rental_dto::{
    CreateRentalRequest, PayRequest, RentalListQuery, RentalRequestBody, UpdateRentalRequest,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::payment::PaymentReceipt;
use crate::models::rental::Rental;
use crate::services::{Action, AuthorizationService};
use crate::state::AppState;
use crate::utils::extract::ApiJson;
use crate::utils::errors::{validation_error, AppError};

pub fn create_rental_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rentals).post(create_rental))
        .route("/request", post(request_rental))
        .route("/:id", get(get_rental).put(update_rental).delete(delete_rental))
        .route("/:id/approve", post(approve_rental))
        .route("/:id/reject", post(reject_rental))
        .route("/:id/cancel", post(cancel_rental))
        .route("/:id/pay", post(pay_rental))
        .route("/:id/return", post(return_rental))
}

async fn list_rentals(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Query(query): Query<RentalListQuery>,
) -> Result<Json<Vec<Rental>>, AppError> {
    AuthorizationService::authorize(&user, Action::ViewRentals)?;
    let controller = RentalController::new(state.store.clone(), state.config.operation_timeout);
    Ok(Json(controller.list(&user, query).await?))
}

async fn get_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Rental>, AppError> {
    AuthorizationService::authorize(&user, Action::ViewRentals)?;
    let controller = RentalController::new(state.store.clone(), state.config.operation_timeout);
    Ok(Json(controller.get_by_id(&user, id).await?))
}

async fn create_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateRentalRequest>,
) -> Result<(StatusCode, Json<Rental>), AppError> {
    AuthorizationService::authorize(&user, Action::CreateRental)?;
    request.validate()?;
    let controller = RentalController::new(state.store.clone(), state.config.operation_timeout);
    let rental = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(rental)))
}

async fn update_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ApiJson(request): ApiJson<UpdateRentalRequest>,
) -> Result<Json<Rental>, AppError> {
    AuthorizationService::authorize(&user, Action::UpdateRental)?;
    request.validate()?;
    let controller = RentalController::new(state.store.clone(), state.config.operation_timeout);
    Ok(Json(controller.update(id, request).await?))
}

async fn delete_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    AuthorizationService::authorize(&user, Action::DeleteRental)?;
    let controller = RentalController::new(state.store.clone(), state.config.operation_timeout);
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("Rental {} deleted", id)
    })))
}

async fn request_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    ApiJson(body): ApiJson<RentalRequestBody>,
) -> Result<(StatusCode, Json<Rental>), AppError> {
    AuthorizationService::authorize(&user, Action::RequestRental)?;
    let renter = state.lifecycle.renter_for(&user).await?;
    let rental = state
        .lifecycle
        .request_rental(renter.renter_id, body.vehicle_id, body.start_date, body.end_date)
        .await?;
    Ok((StatusCode::CREATED, Json(rental)))
}

async fn approve_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Rental>, AppError> {
    AuthorizationService::authorize(&user, Action::ApproveRental)?;
    let approver_id = state.lifecycle.approver_for(&user).await?;
    Ok(Json(state.lifecycle.approve(id, approver_id).await?))
}

async fn reject_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Rental>, AppError> {
    AuthorizationService::authorize(&user, Action::RejectRental)?;
    Ok(Json(state.lifecycle.reject(id).await?))
}

async fn cancel_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Rental>, AppError> {
    AuthorizationService::authorize(&user, Action::CancelRental)?;
    let renter = state.lifecycle.renter_for(&user).await?;
    Ok(Json(state.lifecycle.cancel(renter.renter_id, id).await?))
}

async fn pay_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Result<(StatusCode, Json<PaymentReceipt>), AppError> {
    AuthorizationService::authorize(&user, Action::PayRental)?;
    // El cuerpo es opcional: sin cuerpo se paga total_cost por "online"
    let body: PayRequest = if body.iter().all(u8::is_ascii_whitespace) {
        PayRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|_| validation_error("body", "body must be a JSON object with optional amount and method"))?
    };
    body.validate()?;

    let renter = state.lifecycle.renter_for(&user).await?;
    let receipt = state
        .lifecycle
        .pay(id, renter.renter_id, body.amount, body.method)
        .await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

async fn return_rental(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Rental>, AppError> {
    AuthorizationService::authorize(&user, Action::ReturnRental)?;
    Ok(Json(state.lifecycle.mark_returned(id).await?))
}
