//! ListDoctorsHandler - Query handler for the public doctor directory.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::scheduling::DoctorProfile;
use crate::ports::DoctorRepository;

#[derive(Debug, Clone, Default)]
pub struct ListDoctorsQuery;

pub struct ListDoctorsHandler {
    doctors: Arc<dyn DoctorRepository>,
}

impl ListDoctorsHandler {
    pub fn new(doctors: Arc<dyn DoctorRepository>) -> Self {
        Self { doctors }
    }

    pub async fn handle(&self, _query: ListDoctorsQuery) -> Result<Vec<DoctorProfile>, DomainError> {
        self.doctors.find_all_profiles().await
    }
}
