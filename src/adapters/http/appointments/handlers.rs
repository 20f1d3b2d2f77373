//! HTTP handlers for appointment endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::dto::MessageResponse;
use crate::adapters::http::error::{
    parse_appointment_id, parse_slot_id, parse_user_id, ApiError, JsonBody,
};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::appointment::{
    BookAppointmentCommand, BookAppointmentHandler, DeleteAppointmentCommand,
    DeleteAppointmentHandler, ListDoctorAppointmentsHandler, ListDoctorAppointmentsQuery,
    ListPatientAppointmentsHandler, ListPatientAppointmentsQuery, UpdateAppointmentStatusCommand,
    UpdateAppointmentStatusHandler,
};

use super::dto::{BookAppointmentRequest, UpdateAppointmentStatusRequest};

#[derive(Clone)]
pub struct AppointmentHandlers {
    book_handler: Arc<BookAppointmentHandler>,
    list_patient_handler: Arc<ListPatientAppointmentsHandler>,
    list_doctor_handler: Arc<ListDoctorAppointmentsHandler>,
    update_status_handler: Arc<UpdateAppointmentStatusHandler>,
    delete_handler: Arc<DeleteAppointmentHandler>,
}

impl AppointmentHandlers {
    pub fn new(
        book_handler: Arc<BookAppointmentHandler>,
        list_patient_handler: Arc<ListPatientAppointmentsHandler>,
        list_doctor_handler: Arc<ListDoctorAppointmentsHandler>,
        update_status_handler: Arc<UpdateAppointmentStatusHandler>,
        delete_handler: Arc<DeleteAppointmentHandler>,
    ) -> Self {
        Self {
            book_handler,
            list_patient_handler,
            list_doctor_handler,
            update_status_handler,
            delete_handler,
        }
    }
}

/// POST /api/v1/appointments - Book a slot
pub async fn book_appointment(
    State(handlers): State<AppointmentHandlers>,
    RequireAuth(caller): RequireAuth,
    JsonBody(req): JsonBody<BookAppointmentRequest>,
) -> Result<Response, ApiError> {
    let patient_id = match req.patient_id {
        Some(raw) => parse_user_id("patient_id", raw)?,
        None => caller.id,
    };
    let cmd = BookAppointmentCommand {
        patient_id,
        doctor_id: parse_user_id("doctor_id", req.doctor_id)?,
        slot_id: parse_slot_id("slot_id", &req.slot_id)?,
        status: req.status,
    };

    let appointment = handlers.book_handler.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(appointment)).into_response())
}

/// GET /api/v1/appointments/patient/:patient_id
pub async fn list_patient_appointments(
    State(handlers): State<AppointmentHandlers>,
    RequireAuth(_caller): RequireAuth,
    Path(patient_id): Path<String>,
) -> Result<Response, ApiError> {
    let patient_id = parse_user_id("patient_id", patient_id)?;
    let appointments = handlers
        .list_patient_handler
        .handle(ListPatientAppointmentsQuery { patient_id })
        .await?;
    Ok((StatusCode::OK, Json(appointments)).into_response())
}

/// GET /api/v1/appointments/doctor/:doctor_id
pub async fn list_doctor_appointments(
    State(handlers): State<AppointmentHandlers>,
    RequireAuth(_caller): RequireAuth,
    Path(doctor_id): Path<String>,
) -> Result<Response, ApiError> {
    let doctor_id = parse_user_id("doctor_id", doctor_id)?;
    let appointments = handlers
        .list_doctor_handler
        .handle(ListDoctorAppointmentsQuery { doctor_id })
        .await?;
    Ok((StatusCode::OK, Json(appointments)).into_response())
}

/// PATCH /api/v1/appointments - Confirm or cancel
pub async fn update_appointment_status(
    State(handlers): State<AppointmentHandlers>,
    RequireAuth(_caller): RequireAuth,
    JsonBody(req): JsonBody<UpdateAppointmentStatusRequest>,
) -> Result<Response, ApiError> {
    let cmd = UpdateAppointmentStatusCommand {
        id: parse_appointment_id("id", &req.id)?,
        status: req.status,
    };
    let appointment = handlers.update_status_handler.handle(cmd).await?;
    Ok((StatusCode::OK, Json(appointment)).into_response())
}

/// DELETE /api/v1/appointments/:id
pub async fn delete_appointment(
    State(handlers): State<AppointmentHandlers>,
    RequireAuth(_caller): RequireAuth,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_appointment_id("id", &id)?;
    handlers
        .delete_handler
        .handle(DeleteAppointmentCommand { id })
        .await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Appointment deleted successfully")),
    )
        .into_response())
}
