//! HTTP handlers for availability slot endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::dto::MessageResponse;
use crate::adapters::http::error::{parse_slot_id, parse_user_id, ApiError, JsonBody};
use crate::adapters::http::middleware::RequireAuth;
use crate::application::handlers::schedule::{
    CreateSlotCommand, CreateSlotHandler, DeleteSlotCommand, DeleteSlotHandler, ListSlotsHandler,
    ListSlotsQuery, UpdateSlotCommand, UpdateSlotHandler,
};
use crate::domain::scheduling::clock_time::parse_clock_time;

use super::dto::{CreateSlotRequest, UpdateSlotRequest};

#[derive(Clone)]
pub struct ScheduleHandlers {
    create_handler: Arc<CreateSlotHandler>,
    list_handler: Arc<ListSlotsHandler>,
    update_handler: Arc<UpdateSlotHandler>,
    delete_handler: Arc<DeleteSlotHandler>,
}

impl ScheduleHandlers {
    pub fn new(
        create_handler: Arc<CreateSlotHandler>,
        list_handler: Arc<ListSlotsHandler>,
        update_handler: Arc<UpdateSlotHandler>,
        delete_handler: Arc<DeleteSlotHandler>,
    ) -> Self {
        Self {
            create_handler,
            list_handler,
            update_handler,
            delete_handler,
        }
    }
}

/// POST /api/v1/schedules/create - Publish a weekly slot
pub async fn create_slot(
    State(handlers): State<ScheduleHandlers>,
    RequireAuth(caller): RequireAuth,
    JsonBody(req): JsonBody<CreateSlotRequest>,
) -> Result<Response, ApiError> {
    let doctor_id = match req.doctor_id {
        Some(raw) => parse_user_id("doctor_id", raw)?,
        None => caller.id,
    };
    let cmd = CreateSlotCommand {
        doctor_id,
        day_of_week: req.day_of_week,
        start_time: parse_clock_time("start_time", &req.start_time)?,
        end_time: parse_clock_time("end_time", &req.end_time)?,
        status: req.status,
    };

    let slot = handlers.create_handler.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(slot)).into_response())
}

/// GET /api/v1/schedules/:doctor_id - A doctor's slots
pub async fn list_slots(
    State(handlers): State<ScheduleHandlers>,
    Path(doctor_id): Path<String>,
) -> Result<Response, ApiError> {
    let doctor_id = parse_user_id("doctor_id", doctor_id)?;
    let slots = handlers
        .list_handler
        .handle(ListSlotsQuery { doctor_id })
        .await?;
    Ok((StatusCode::OK, Json(slots)).into_response())
}

/// PUT /api/v1/schedules/schedule/:id - Move or re-time a slot
pub async fn update_slot(
    State(handlers): State<ScheduleHandlers>,
    RequireAuth(_caller): RequireAuth,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateSlotRequest>,
) -> Result<Response, ApiError> {
    let id = parse_slot_id("id", &id)?;
    let patch = req.into_patch()?;
    let slot = handlers
        .update_handler
        .handle(UpdateSlotCommand { id, patch })
        .await?;
    Ok((StatusCode::OK, Json(slot)).into_response())
}

/// DELETE /api/v1/schedules/schedule/:id - Remove an unbooked slot
pub async fn delete_slot(
    State(handlers): State<ScheduleHandlers>,
    RequireAuth(_caller): RequireAuth,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id = parse_slot_id("id", &id)?;
    handlers
        .delete_handler
        .handle(DeleteSlotCommand { id })
        .await?;
    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Schedule deleted successfully")),
    )
        .into_response())
}
