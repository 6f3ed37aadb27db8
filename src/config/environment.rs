//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub cors_origins: Vec<String>,
    pub log_level: tracing::Level,
    /// Espera máxima por el lock de un vehículo dentro de una transacción
    pub lock_timeout: Duration,
    /// Duración máxima de una operación del ciclo de vida
    pub operation_timeout: Duration,
}

impl EnvironmentConfig {
    /// Cargar la configuración desde las variables de entorno
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parse_or("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            log_level: parse_or("LOG_LEVEL", tracing::Level::DEBUG)?,
            lock_timeout: Duration::from_millis(parse_or("LOCK_TIMEOUT_MS", 2000)?),
            operation_timeout: Duration::from_millis(parse_or("OPERATION_TIMEOUT_MS", 5000)?),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Leer una variable opcional, usando `default` si no está definida
pub(crate) fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        let origins = parse_origins("http://localhost:3001, https://rent.example.com,,");
        assert_eq!(origins, vec!["http://localhost:3001", "https://rent.example.com"]);
    }

    #[test]
    fn test_parse_or_uses_default_when_missing() {
        let value: u64 = parse_or("VEHICLE_RENTAL_TEST_UNSET_VAR", 42).unwrap();
        assert_eq!(value, 42);
    }
}
