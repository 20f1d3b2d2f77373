//! HTTP handlers for doctor endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::error::{parse_user_id, ApiError, JsonBody};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::doctor::{
    GetDoctorHandler, GetDoctorQuery, ListDoctorsHandler, ListDoctorsQuery, UpdateDoctorCommand,
    UpdateDoctorHandler,
};

use super::dto::{DoctorListResponse, UpdateDoctorRequest};

#[derive(Clone)]
pub struct DoctorHandlers {
    list_handler: Arc<ListDoctorsHandler>,
    get_handler: Arc<GetDoctorHandler>,
    update_handler: Arc<UpdateDoctorHandler>,
}

impl DoctorHandlers {
    pub fn new(
        list_handler: Arc<ListDoctorsHandler>,
        get_handler: Arc<GetDoctorHandler>,
        update_handler: Arc<UpdateDoctorHandler>,
    ) -> Self {
        Self {
            list_handler,
            get_handler,
            update_handler,
        }
    }
}

/// GET /api/v1/doctors - The doctor directory
pub async fn list_doctors(State(handlers): State<DoctorHandlers>) -> Result<Response, ApiError> {
    let doctors = handlers.list_handler.handle(ListDoctorsQuery).await?;
    Ok((StatusCode::OK, Json(DoctorListResponse { doctors })).into_response())
}

/// GET /api/v1/doctors/:uid - One doctor's profile
pub async fn get_doctor(
    State(handlers): State<DoctorHandlers>,
    Path(uid): Path<String>,
) -> Result<Response, ApiError> {
    let uid = parse_user_id("uid", uid)?;
    let profile = handlers.get_handler.handle(GetDoctorQuery { uid }).await?;
    Ok((StatusCode::OK, Json(profile)).into_response())
}

/// PUT /api/v1/doctors/:uid - Change specialty or location
pub async fn update_doctor(
    State(handlers): State<DoctorHandlers>,
    RequireAuth(_caller): RequireAuth,
    Path(uid): Path<String>,
    JsonBody(req): JsonBody<UpdateDoctorRequest>,
) -> Result<Response, ApiError> {
    let uid = parse_user_id("uid", uid)?;
    let doctor = handlers
        .update_handler
        .handle(UpdateDoctorCommand {
            uid,
            patch: req.into(),
        })
        .await?;
    Ok((StatusCode::OK, Json(doctor)).into_response())
}
