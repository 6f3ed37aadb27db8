use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Roles del sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Renter,
    Staff,
    Manager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Renter => "renter",
            UserRole::Staff => "staff",
            UserRole::Manager => "manager",
        }
    }

    pub fn is_employee(&self) -> bool {
        matches!(self, UserRole::Staff | UserRole::Manager)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "renter" => Ok(UserRole::Renter),
            "staff" => Ok(UserRole::Staff),
            "manager" => Ok(UserRole::Manager),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// Usuario autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// Username del empleado: la parte local del email
    pub fn username(&self) -> &str {
        self.email.split('@').next().unwrap_or(&self.email)
    }
}
