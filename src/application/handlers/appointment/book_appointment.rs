//! BookAppointmentHandler - Reserves a slot for a patient.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, SlotId, UserId};
use crate::domain::scheduling::{Appointment, AppointmentStatus, NewAppointment};
use crate::ports::AppointmentRepository;

/// Command to book an appointment.
#[derive(Debug, Clone)]
pub struct BookAppointmentCommand {
    pub patient_id: UserId,
    pub doctor_id: UserId,
    pub slot_id: SlotId,
    /// Defaults to pending.
    pub status: Option<AppointmentStatus>,
}

pub struct BookAppointmentHandler {
    appointments: Arc<dyn AppointmentRepository>,
}

impl BookAppointmentHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    /// # Errors
    ///
    /// - `SlotNotFound` if the slot does not exist
    /// - `ValidationFailed` if the slot belongs to another doctor
    /// - `SlotUnavailable` if the slot is already reserved
    /// - `UserNotFound` if the patient does not exist
    pub async fn handle(&self, cmd: BookAppointmentCommand) -> Result<Appointment, DomainError> {
        let mut request = NewAppointment::new(cmd.patient_id, cmd.doctor_id, cmd.slot_id);
        if let Some(status) = cmd.status {
            if status == AppointmentStatus::Cancelled {
                return Err(DomainError::validation(
                    "status",
                    "An appointment cannot be booked as cancelled",
                ));
            }
            request.status = status;
        }

        let appointment = self.appointments.book(request).await?;

        info!(
            appointment_id = %appointment.id,
            slot_id = %appointment.slot_id,
            patient_id = %appointment.patient_id,
            "Appointment booked"
        );
        Ok(appointment)
    }
}
