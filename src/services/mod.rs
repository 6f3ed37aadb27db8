//! Services module
//!
//! Este módulo contiene la lógica de negocio: la máquina de estados de
//! alquileres, la comprobación de disponibilidad, el ciclo de vida que
//! las coordina sobre el `EntityStore` y la política de acceso.

pub mod authorization_service;
pub mod availability_service;
pub mod rental_lifecycle_service;
pub mod rental_transitions;

pub use authorization_service::{Action, AuthorizationService};
pub use availability_service::AvailabilityChecker;
pub use rental_lifecycle_service::RentalLifecycleService;
pub use rental_transitions::{plan_transition, RentalEvent, TransitionPlan};
