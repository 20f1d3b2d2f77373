//! HTTP adapters - REST API implementations.
//!
//! Each area has its own adapter (DTOs, axum handlers, routes). `api_router`
//! wires them to the application handlers and puts everything under
//! `/api/v1`.

pub mod appointments;
pub mod doctors;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod schedules;
pub mod users;

mod router;

pub use error::{ApiError, ErrorResponse};
pub use router::{api_router, ApiDependencies};
