use crate::models::auth::{AuthenticatedUser, UserRole};
use crate::utils::errors::{forbidden_error, AppResult};

/// Acciones protegidas por rol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RequestRental,
    CancelRental,
    PayRental,
    ApproveRental,
    RejectRental,
    ReturnRental,
    ViewRentals,
    CreateRental,
    UpdateRental,
    DeleteRental,
    ViewVehicles,
    ManageVehicles,
    ViewReports,
    ClearHistory,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::RequestRental => "request a rental",
            Action::CancelRental => "cancel a rental",
            Action::PayRental => "pay a rental",
            Action::ApproveRental => "approve a rental",
            Action::RejectRental => "reject a rental",
            Action::ReturnRental => "mark a rental as returned",
            Action::ViewRentals => "view rentals",
            Action::CreateRental => "create a rental",
            Action::UpdateRental => "update a rental",
            Action::DeleteRental => "delete a rental",
            Action::ViewVehicles => "view vehicles",
            Action::ManageVehicles => "manage vehicles",
            Action::ViewReports => "view reports",
            Action::ClearHistory => "clear rental history",
        }
    }

    /// Roles que pueden ejecutar la acción
    pub fn allowed_roles(&self) -> &'static [UserRole] {
        const RENTER: &[UserRole] = &[UserRole::Renter];
        const EMPLOYEES: &[UserRole] = &[UserRole::Staff, UserRole::Manager];
        const MANAGER: &[UserRole] = &[UserRole::Manager];
        const EVERYONE: &[UserRole] = &[UserRole::Renter, UserRole::Staff, UserRole::Manager];

        match self {
            Action::RequestRental | Action::CancelRental | Action::PayRental => RENTER,
            Action::ApproveRental
            | Action::RejectRental
            | Action::ReturnRental
            | Action::CreateRental
            | Action::UpdateRental
            | Action::ManageVehicles => EMPLOYEES,
            Action::ViewRentals | Action::ViewVehicles => EVERYONE,
            Action::DeleteRental | Action::ViewReports | Action::ClearHistory => MANAGER,
        }
    }
}

/// Servicio de autorización: tabla de reglas por rol
pub struct AuthorizationService;

impl AuthorizationService {
    pub fn is_allowed(user: &AuthenticatedUser, action: Action) -> bool {
        action.allowed_roles().contains(&user.role)
    }

    /// Falla con `Forbidden` si el rol del usuario no cubre la acción
    pub fn authorize(user: &AuthenticatedUser, action: Action) -> AppResult<()> {
        if Self::is_allowed(user, action) {
            Ok(())
        } else {
            Err(forbidden_error(
                action.name(),
                &format!("role '{}' is not allowed", user.role.as_str()),
            ))
        }
    }
}
