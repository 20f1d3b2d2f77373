//! UpdateDoctorHandler - Partial update of specialty and location.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::{Doctor, DoctorPatch};
use crate::ports::DoctorRepository;

use super::get_doctor::doctor_not_found;

#[derive(Debug, Clone)]
pub struct UpdateDoctorCommand {
    pub uid: UserId,
    pub patch: DoctorPatch,
}

pub struct UpdateDoctorHandler {
    doctors: Arc<dyn DoctorRepository>,
}

impl UpdateDoctorHandler {
    pub fn new(doctors: Arc<dyn DoctorRepository>) -> Self {
        Self { doctors }
    }

    /// An empty patch is allowed and only refreshes `updated_at`.
    pub async fn handle(&self, cmd: UpdateDoctorCommand) -> Result<Doctor, DomainError> {
        cmd.patch.validate()?;

        self.doctors
            .update(&cmd.uid, cmd.patch)
            .await?
            .ok_or_else(|| doctor_not_found(&cmd.uid))
    }
}
