//! Appointment booking and lifecycle handlers.

mod book_appointment;
mod delete_appointment;
mod list_appointments;
mod update_appointment_status;

pub use book_appointment::{BookAppointmentCommand, BookAppointmentHandler};
pub use delete_appointment::{DeleteAppointmentCommand, DeleteAppointmentHandler};
pub use list_appointments::{
    ListDoctorAppointmentsHandler, ListDoctorAppointmentsQuery, ListPatientAppointmentsHandler,
    ListPatientAppointmentsQuery,
};
pub use update_appointment_status::{
    UpdateAppointmentStatusCommand, UpdateAppointmentStatusHandler,
};

use crate::domain::foundation::{AppointmentId, DomainError, ErrorCode};

fn appointment_not_found(id: &AppointmentId) -> DomainError {
    DomainError::new(
        ErrorCode::AppointmentNotFound,
        format!("Appointment {} not found", id),
    )
    .with_detail("appointment_id", id.to_string())
}
