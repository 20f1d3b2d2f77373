//! UpdateAppointmentStatusHandler - Confirms or cancels an appointment.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{AppointmentId, DomainError};
use crate::domain::scheduling::{Appointment, AppointmentStatus};
use crate::ports::AppointmentRepository;

use super::appointment_not_found;

#[derive(Debug, Clone)]
pub struct UpdateAppointmentStatusCommand {
    pub id: AppointmentId,
    pub status: AppointmentStatus,
}

pub struct UpdateAppointmentStatusHandler {
    appointments: Arc<dyn AppointmentRepository>,
}

impl UpdateAppointmentStatusHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    /// # Errors
    ///
    /// - `AppointmentNotFound` if the appointment does not exist
    /// - `InvalidStateTransition` for a move the lifecycle does not allow
    pub async fn handle(
        &self,
        cmd: UpdateAppointmentStatusCommand,
    ) -> Result<Appointment, DomainError> {
        let appointment = self
            .appointments
            .update_status(&cmd.id, cmd.status)
            .await?
            .ok_or_else(|| appointment_not_found(&cmd.id))?;

        info!(appointment_id = %appointment.id, status = %appointment.status, "Appointment status updated");
        Ok(appointment)
    }
}
