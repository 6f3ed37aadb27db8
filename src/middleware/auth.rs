//! Middleware de autenticación JWT
//!
//! Este módulo verifica el bearer token y deja el usuario autenticado
//! en las extensions de la request. La emisión de tokens es externa.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::{
    models::auth::{AuthenticatedUser, UserRole},
    state::AppState,
    utils::{
        errors::AppError,
        jwt::{extract_token_from_header, verify_token},
    },
};

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization token required".to_string()))?;
    let token = extract_token_from_header(auth_header)?;

    let claims = verify_token(token, &state.jwt)?;
    let role: UserRole = claims
        .role
        .parse()
        .map_err(|_| AppError::Unauthorized(format!("Unknown role '{}'", claims.role)))?;

    debug!("🔐 {} autenticado como {}", claims.email, role.as_str());

    // Inyectar usuario autenticado en las extensions
    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        email: claims.email,
        role,
    });

    Ok(next.run(request).await)
}
