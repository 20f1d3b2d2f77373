//! Appointment repository port.
//!
//! Booking is the one multi-record write in the system: the slot check, the
//! slot reservation and the appointment insert form a single unit. Of two
//! concurrent bookings of the same slot, exactly one succeeds.

use crate::domain::foundation::{AppointmentId, DomainError, UserId};
use crate::domain::scheduling::{Appointment, AppointmentStatus, NewAppointment};
use async_trait::async_trait;

/// Repository port for appointments.
///
/// Implementations are constructed with a `release_slot_on_cancel` switch.
/// When on, cancelling or deleting an active appointment sets its slot back
/// to available in the same unit of work.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Reserve the slot and insert the appointment atomically.
    ///
    /// # Errors
    ///
    /// - `SlotNotFound` if the slot does not exist
    /// - `ValidationFailed` if the slot belongs to a different doctor
    /// - `SlotUnavailable` if the slot is not available
    /// - `DatabaseError` on persistence failure
    async fn book(&self, request: NewAppointment) -> Result<Appointment, DomainError>;

    async fn find_by_id(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError>;

    async fn list_by_patient(&self, patient_id: &UserId) -> Result<Vec<Appointment>, DomainError>;

    async fn list_by_doctor(&self, doctor_id: &UserId) -> Result<Vec<Appointment>, DomainError>;

    /// Move an appointment to a new status.
    ///
    /// Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// - `InvalidStateTransition` if the status change is not allowed
    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, DomainError>;

    /// Remove an appointment. Returns the removed appointment.
    async fn delete(&self, id: &AppointmentId) -> Result<Option<Appointment>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appointment_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn AppointmentRepository) {}
    }
}
