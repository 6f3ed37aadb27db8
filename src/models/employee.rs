//! Modelo de Employee

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};

/// Rol del empleado - mapea al ENUM employee_role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[sqlx(type_name = "employee_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EmployeeRole {
    Staff,
    Manager,
}

/// Employee - mapea a la tabla employees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub employee_id: i64,
    pub full_name: String,
    pub position: Option<String>,
    pub role: EmployeeRole,
    pub username: String,
    pub created_at: DateTime<Utc>,
}
