//! Extractores de Axum
//!
//! `ApiJson` envuelve el extractor `Json` para que un cuerpo mal formado,
//! con campos que faltan o sin `Content-Type` salga como error de
//! validación (422) con el formato JSON de `AppError`.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::ValidationError;

use crate::utils::errors::{field_validation_error, AppError};

/// Cuerpo JSON deserializado; los rechazos se convierten en `AppError`
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(body_rejection_error)?;
        Ok(ApiJson(value))
    }
}

/// Rechazo del extractor `Json` como error de validación del campo `body`
pub fn body_rejection_error(rejection: JsonRejection) -> AppError {
    let mut error = ValidationError::new("json");
    error.message = Some(rejection.body_text().into());
    field_validation_error("body", error)
}
