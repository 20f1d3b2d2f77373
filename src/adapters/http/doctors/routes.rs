//! HTTP routes for doctor endpoints.

use axum::{routing::get, Router};

use super::handlers::{get_doctor, list_doctors, update_doctor, DoctorHandlers};

/// Creates the doctor router, mounted at `/api/v1/doctors`.
pub fn doctor_routes(handlers: DoctorHandlers) -> Router {
    Router::new()
        .route("/", get(list_doctors))
        .route("/:uid", get(get_doctor).put(update_doctor))
        .with_state(handlers)
}
