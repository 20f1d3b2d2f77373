//! HTTP DTOs for appointment endpoints.

use serde::Deserialize;

use crate::domain::scheduling::AppointmentStatus;

/// Booking request. `schedule_id` is accepted as an alias of `slot_id`.
#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    /// Defaults to the caller.
    #[serde(default)]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub doctor_id: String,
    #[serde(default, alias = "schedule_id")]
    pub slot_id: String,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}

/// Body of `PATCH /appointments`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAppointmentStatusRequest {
    #[serde(default)]
    pub id: String,
    pub status: AppointmentStatus,
}
