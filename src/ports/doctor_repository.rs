//! Doctor repository port.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::{Doctor, DoctorPatch, DoctorProfile, NewDoctor};
use async_trait::async_trait;

/// Repository port for doctor records and the joined profile view.
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// Insert the doctor record for an existing user.
    ///
    /// # Errors
    ///
    /// - `DoctorProfileExists` if the user already has a doctor record
    /// - `UserNotFound` if the user does not exist
    /// - `DatabaseError` on persistence failure
    async fn create(&self, doctor: NewDoctor) -> Result<Doctor, DomainError>;

    /// Returns `None` if the user has no doctor record.
    async fn find_by_user_uid(&self, uid: &UserId) -> Result<Option<Doctor>, DomainError>;

    /// Apply a partial update. An empty patch only refreshes `updated_at`.
    ///
    /// Returns `None` if the doctor does not exist.
    async fn update(&self, uid: &UserId, patch: DoctorPatch)
        -> Result<Option<Doctor>, DomainError>;

    /// Every doctor joined with their user record.
    async fn find_all_profiles(&self) -> Result<Vec<DoctorProfile>, DomainError>;

    /// One doctor joined with their user record.
    async fn find_profile(&self, uid: &UserId) -> Result<Option<DoctorProfile>, DomainError>;
}
