//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        conflicting_rental_id: Option<i64>,
    },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("JWT error: {0}")]
    Jwt(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    code: String,
}

impl AppError {
    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unauthorized(_) | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Busy(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Código estable que consume el frontend
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Database(_) => "DB_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::InvalidState(_) => "INVALID_STATE",
            AppError::Busy(_) => "BUSY",
            AppError::Jwt(_) => "JWT_ERROR",
        }
    }

    /// Indica si el cliente puede reintentar la operación completa
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Busy(_))
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if matches!(e, sqlx::Error::PoolTimedOut) {
            return AppError::Busy("Timed out waiting for a database connection".to_string());
        }

        let sqlstate = e
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned());

        sqlstate
            .as_deref()
            .and_then(sqlstate_error)
            .unwrap_or(AppError::Database(e))
    }
}

/// Errores de PostgreSQL que tienen un equivalente en la API
fn sqlstate_error(code: &str) -> Option<AppError> {
    let error = match code {
        // lock_not_available, serialization_failure, deadlock_detected
        "55P03" | "40001" | "40P01" => {
            AppError::Busy("The vehicle is locked by another operation, retry".to_string())
        }
        // exclusion_violation: respaldo del esquema contra el doble alquiler
        "23P01" => AppError::Conflict {
            message: "Vehicle is already rented for the selected dates".to_string(),
            conflicting_rental_id: None,
        },
        "23505" => AppError::Conflict {
            message: "A record with the same unique value already exists".to_string(),
            conflicting_rental_id: None,
        },
        "23503" => AppError::NotFound("Referenced record not found".to_string()),
        // numeric_value_out_of_range
        "22003" => validation_error("value", "numeric value out of range"),
        _ => return None,
    };
    Some(error)
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code().to_string();
        let retryable = self.is_retryable();

        if status.is_server_error() {
            error!("❌ {}", self);
        } else {
            warn!("⚠️ {}", self);
        }

        let error_response = match self {
            AppError::Database(e) => ErrorResponse {
                error: "Database Error".to_string(),
                message: "An error occurred while accessing the database".to_string(),
                details: Some(json!({ "sql_error": e.to_string() })),
                code,
            },

            AppError::Validation(e) => ErrorResponse {
                error: "Validation Error".to_string(),
                message: "The provided data is invalid".to_string(),
                details: Some(json!(e)),
                code,
            },

            AppError::Unauthorized(msg) | AppError::Jwt(msg) => ErrorResponse {
                error: "Unauthorized".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::Forbidden(msg) => ErrorResponse {
                error: "Forbidden".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::NotFound(msg) => ErrorResponse {
                error: "Not Found".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::Conflict { message, conflicting_rental_id } => ErrorResponse {
                error: "Conflict".to_string(),
                message,
                details: conflicting_rental_id
                    .map(|id| json!({ "conflicting_rental_id": id })),
                code,
            },

            AppError::InvalidState(msg) => ErrorResponse {
                error: "Invalid State".to_string(),
                message: msg,
                details: None,
                code,
            },

            AppError::Busy(msg) => ErrorResponse {
                error: "Service Busy".to_string(),
                message: msg,
                details: Some(json!({ "retryable": retryable })),
                code,
            },
        };

        let mut response = (status, Json(error_response)).into_response();
        if retryable {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de validación
pub fn validation_error(field: &'static str, message: &'static str) -> AppError {
    use validator::ValidationError;

    let mut error = ValidationError::new("custom");
    error.message = Some(message.into());
    error.add_param("field".into(), &field);

    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);

    AppError::Validation(errors)
}

/// Envolver un `ValidationError` de campo en `AppError::Validation`
pub fn field_validation_error(field: &'static str, error: validator::ValidationError) -> AppError {
    let mut errors = validator::ValidationErrors::new();
    errors.add(field, error);
    AppError::Validation(errors)
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Conflicto por solapamiento con otro alquiler activo
pub fn rental_conflict_error(conflicting_rental_id: i64) -> AppError {
    AppError::Conflict {
        message: "Vehicle is already rented for the selected dates".to_string(),
        conflicting_rental_id: Some(conflicting_rental_id),
    }
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(resource: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict {
        message: format!("{} with {} '{}' already exists", resource, field, value),
        conflicting_rental_id: None,
    }
}

/// Función helper para crear errores de acceso prohibido
pub fn forbidden_error(operation: &str, reason: &str) -> AppError {
    AppError::Forbidden(format!("Cannot {}: {}", operation, reason))
}

/// Función helper para crear errores de transición inválida
pub fn invalid_state_error(message: &str) -> AppError {
    AppError::InvalidState(message.to_string())
}
