//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Repository Ports
//!
//! - `UserRepository` - Account records
//! - `DoctorRepository` - Doctor records and profile view
//! - `SlotRepository` - Weekly availability slots
//! - `AppointmentRepository` - Bookings, including the atomic reserve-and-insert
//!
//! ## Identity Ports
//!
//! - `IdentityProvider` - Account creation, sign-in and email flows
//! - `SessionValidator` - Session token validation

mod appointment_repository;
mod doctor_repository;
mod identity_provider;
mod session_validator;
mod slot_repository;
mod user_repository;

pub use appointment_repository::AppointmentRepository;
pub use doctor_repository::DoctorRepository;
pub use identity_provider::IdentityProvider;
pub use session_validator::SessionValidator;
pub use slot_repository::SlotRepository;
pub use user_repository::UserRepository;
