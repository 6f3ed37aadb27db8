use axum::{
    extract::State,
    routing::{delete, get},
    Extension, Json, Router,
};

use crate::controllers::report_controller::ReportController;
use crate::dto::rental_dto::ClearHistoryResponse;
use crate::models::auth::AuthenticatedUser;
use crate::models::rental::Rental;
use crate::services::{Action, AuthorizationService};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_report_router() -> Router<AppState> {
    Router::new()
        .route("/active", get(active_rentals))
        .route("/history", get(rental_history))
        .route("/history/clear", delete(clear_history))
}

async fn active_rentals(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Rental>>, AppError> {
    AuthorizationService::authorize(&user, Action::ViewReports)?;
    let controller = ReportController::new(state.store.clone());
    Ok(Json(controller.active_rentals().await?))
}

async fn rental_history(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<Vec<Rental>>, AppError> {
    AuthorizationService::authorize(&user, Action::ViewReports)?;
    let controller = ReportController::new(state.store.clone());
    Ok(Json(controller.rental_history().await?))
}

async fn clear_history(
    Extension(user): Extension<AuthenticatedUser>,
    State(state): State<AppState>,
) -> Result<Json<ClearHistoryResponse>, AppError> {
    AuthorizationService::authorize(&user, Action::ClearHistory)?;
    let controller = ReportController::new(state.store.clone());
    let deleted_count = controller.clear_history().await?;
    Ok(Json(ClearHistoryResponse {
        message: format!("{} rentals removed from history", deleted_count),
        deleted_count,
    }))
}
