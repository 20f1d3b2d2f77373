//! HTTP DTOs for availability slot endpoints.
//!
//! Times travel as `"HH:MM"` strings and days as weekday names.

use serde::Deserialize;

use crate::domain::foundation::ValidationError;
use crate::domain::scheduling::clock_time::parse_clock_time;
use crate::domain::scheduling::{DayOfWeek, SlotPatch, SlotStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlotRequest {
    /// Defaults to the caller.
    #[serde(default)]
    pub doctor_id: Option<String>,
    pub day_of_week: DayOfWeek,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub status: Option<SlotStatus>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSlotRequest {
    pub day_of_week: Option<DayOfWeek>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub status: Option<SlotStatus>,
}

impl UpdateSlotRequest {
    pub fn into_patch(self) -> Result<SlotPatch, ValidationError> {
        let start_time = self
            .start_time
            .map(|raw| parse_clock_time("start_time", &raw))
            .transpose()?;
        let end_time = self
            .end_time
            .map(|raw| parse_clock_time("end_time", &raw))
            .transpose()?;
        Ok(SlotPatch {
            day_of_week: self.day_of_week,
            start_time,
            end_time,
            status: self.status,
        })
    }
}
