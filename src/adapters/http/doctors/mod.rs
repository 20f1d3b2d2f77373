//! HTTP adapter for the doctor directory.

mod dto;
mod handlers;
mod routes;

pub use dto::{DoctorListResponse, UpdateDoctorRequest};
pub use handlers::DoctorHandlers;
pub use routes::doctor_routes;
