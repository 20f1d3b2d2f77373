//! DeleteAppointmentHandler - Removes an appointment.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{AppointmentId, DomainError};
use crate::domain::scheduling::Appointment;
use crate::ports::AppointmentRepository;

use super::appointment_not_found;

#[derive(Debug, Clone)]
pub struct DeleteAppointmentCommand {
    pub id: AppointmentId,
}

pub struct DeleteAppointmentHandler {
    appointments: Arc<dyn AppointmentRepository>,
}

impl DeleteAppointmentHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    pub async fn handle(&self, cmd: DeleteAppointmentCommand) -> Result<Appointment, DomainError> {
        let removed = self
            .appointments
            .delete(&cmd.id)
            .await?
            .ok_or_else(|| appointment_not_found(&cmd.id))?;

        info!(appointment_id = %removed.id, slot_id = %removed.slot_id, "Appointment deleted");
        Ok(removed)
    }
}
