//! Appointments linking a patient to a doctor's slot.

use crate::domain::foundation::{
    AppointmentId, DomainError, SlotId, StateMachine, Timestamp, UserId, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked by the patient, awaiting the doctor.
    #[default]
    Pending,

    /// Accepted by the doctor.
    Confirmed,

    /// Called off by either side. Terminal.
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Returns true while the appointment holds its slot.
    pub fn is_active(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl StateMachine for AppointmentStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, target),
            (Pending, Confirmed) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AppointmentStatus::*;
        match self {
            Pending => vec![Confirmed, Cancelled],
            Confirmed => vec![Cancelled],
            Cancelled => vec![],
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown appointment status '{}'", other),
            )),
        }
    }
}

/// A booking of one slot by one patient.
///
/// # Invariants
///
/// - While `status` is not cancelled, the referenced slot is `reserved`.
/// - `doctor_id` equals the slot's `doctor_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub patient_id: UserId,
    pub doctor_id: UserId,
    pub slot_id: SlotId,
    pub status: AppointmentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Appointment {
    /// Moves the appointment to `target`, refreshing `updated_at`.
    ///
    /// Returns true when the slot should be handed back, i.e. the appointment
    /// just became cancelled.
    pub fn transition(
        &mut self,
        target: AppointmentStatus,
        now: Timestamp,
    ) -> Result<bool, DomainError> {
        let was_active = self.status.is_active();
        self.status = self.status.transition_to(target)?;
        self.updated_at = now;
        Ok(was_active && !self.status.is_active())
    }
}

/// Booking request accepted by the appointment store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub patient_id: UserId,
    pub doctor_id: UserId,
    pub slot_id: SlotId,
    pub status: AppointmentStatus,
}

impl NewAppointment {
    pub fn new(patient_id: UserId, doctor_id: UserId, slot_id: SlotId) -> Self {
        Self {
            patient_id,
            doctor_id,
            slot_id,
            status: AppointmentStatus::Pending,
        }
    }

    pub fn into_appointment(self, id: AppointmentId, now: Timestamp) -> Appointment {
        Appointment {
            id,
            patient_id: self.patient_id,
            doctor_id: self.doctor_id,
            slot_id: self.slot_id,
            status: self.status,
            created_at: now,
            updated_at: now,
        }
    }
}
