//! HTTP routes for availability slot endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{create_slot, delete_slot, list_slots, update_slot, ScheduleHandlers};

/// Creates the slot router, mounted at `/api/v1/schedules`.
pub fn schedule_routes(handlers: ScheduleHandlers) -> Router {
    Router::new()
        .route("/create", post(create_slot))
        .route("/schedule/:id", put(update_slot).delete(delete_slot))
        .route("/:doctor_id", get(list_slots))
        .with_state(handlers)
}
