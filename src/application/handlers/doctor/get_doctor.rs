//! GetDoctorHandler - Query handler for a single doctor profile.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::scheduling::DoctorProfile;
use crate::ports::DoctorRepository;

#[derive(Debug, Clone)]
pub struct GetDoctorQuery {
    pub uid: UserId,
}

pub struct GetDoctorHandler {
    doctors: Arc<dyn DoctorRepository>,
}

impl GetDoctorHandler {
    pub fn new(doctors: Arc<dyn DoctorRepository>) -> Self {
        Self { doctors }
    }

    pub async fn handle(&self, query: GetDoctorQuery) -> Result<DoctorProfile, DomainError> {
        self.doctors
            .find_profile(&query.uid)
            .await?
            .ok_or_else(|| doctor_not_found(&query.uid))
    }
}

pub(crate) fn doctor_not_found(uid: &UserId) -> DomainError {
    DomainError::new(
        ErrorCode::DoctorNotFound,
        format!("Doctor with UID {} not found", uid),
    )
    .with_detail("uid", uid.to_string())
}
