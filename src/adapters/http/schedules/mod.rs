//! HTTP adapter for doctor availability slots.

mod dto;
mod handlers;
mod routes;

pub use dto::{CreateSlotRequest, UpdateSlotRequest};
pub use handlers::ScheduleHandlers;
pub use routes::schedule_routes;
