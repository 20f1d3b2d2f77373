//! HTTP adapter for appointment booking.

mod dto;
mod handlers;
mod routes;

pub use dto::{BookAppointmentRequest, UpdateAppointmentStatusRequest};
pub use handlers::AppointmentHandlers;
pub use routes::appointment_routes;
