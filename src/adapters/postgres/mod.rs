//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresUserRepository` - Account records
//! - `PostgresDoctorRepository` - Doctor records and the joined profile view
//! - `PostgresSlotRepository` - Availability slots
//! - `PostgresAppointmentRepository` - Appointments, booking under a slot row lock
//!
//! Enum columns are stored as TEXT and decoded through the domain `FromStr`
//! impls, so unknown values surface as `DATABASE_ERROR` instead of leaking.

mod appointment_repository;
mod doctor_repository;
mod slot_repository;
mod user_repository;

pub use appointment_repository::PostgresAppointmentRepository;
pub use doctor_repository::PostgresDoctorRepository;
pub use slot_repository::PostgresSlotRepository;
pub use user_repository::PostgresUserRepository;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};

/// Embedded schema migrations from `migrations/`.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Name of the constraint a database error violated, if any.
pub(crate) fn violated_constraint(err: &sqlx::Error) -> Option<&str> {
    match err {
        sqlx::Error::Database(db_err) => db_err.constraint(),
        _ => None,
    }
}

/// Decodes a stored TEXT column through the domain parser.
pub(crate) fn decode<T>(column: &str, raw: &str) -> Result<T, DomainError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid {} value '{}': {}", column, raw, e),
        )
    })
}

pub(crate) fn decode_user_id(column: &str, raw: String) -> Result<UserId, DomainError> {
    UserId::new(raw).map_err(|e| {
        DomainError::new(ErrorCode::DatabaseError, format!("Invalid {}: {}", column, e))
    })
}
