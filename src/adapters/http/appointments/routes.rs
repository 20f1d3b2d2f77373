//! HTTP routes for appointment endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers::{
    book_appointment, delete_appointment, list_doctor_appointments, list_patient_appointments,
    update_appointment_status, AppointmentHandlers,
};

/// Creates the appointment router, mounted at `/api/v1/appointments`.
pub fn appointment_routes(handlers: AppointmentHandlers) -> Router {
    Router::new()
        .route("/", post(book_appointment).patch(update_appointment_status))
        .route("/patient/:patient_id", get(list_patient_appointments))
        .route("/doctor/:doctor_id", get(list_doctor_appointments))
        .route("/:id", delete(delete_appointment))
        .with_state(handlers)
}
