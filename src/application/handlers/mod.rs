//! Application handlers.
//!
//! One command or query handler per operation, grouped by area. Handlers
//! hold their ports as `Arc<dyn Port>` and return `DomainError`.

pub mod account;
pub mod appointment;
pub mod doctor;
pub mod schedule;

#[cfg(test)]
pub(crate) mod fixtures;

pub use account::*;
pub use appointment::*;
pub use doctor::*;
pub use schedule::*;
