//! Query handlers listing appointments for a patient or a doctor.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::Appointment;
use crate::ports::AppointmentRepository;

#[derive(Debug, Clone)]
pub struct ListPatientAppointmentsQuery {
    pub patient_id: UserId,
}

pub struct ListPatientAppointmentsHandler {
    appointments: Arc<dyn AppointmentRepository>,
}

impl ListPatientAppointmentsHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    pub async fn handle(
        &self,
        query: ListPatientAppointmentsQuery,
    ) -> Result<Vec<Appointment>, DomainError> {
        self.appointments.list_by_patient(&query.patient_id).await
    }
}

#[derive(Debug, Clone)]
pub struct ListDoctorAppointmentsQuery {
    pub doctor_id: UserId,
}

pub struct ListDoctorAppointmentsHandler {
    appointments: Arc<dyn AppointmentRepository>,
}

impl ListDoctorAppointmentsHandler {
    pub fn new(appointments: Arc<dyn AppointmentRepository>) -> Self {
        Self { appointments }
    }

    pub async fn handle(
        &self,
        query: ListDoctorAppointmentsQuery,
    ) -> Result<Vec<Appointment>, DomainError> {
        self.appointments.list_by_doctor(&query.doctor_id).await
    }
}
