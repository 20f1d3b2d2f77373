//! Doctor records and the joined doctor profile view.

use crate::domain::foundation::{Timestamp, UserId, ValidationError};
use serde::{Deserialize, Serialize};

use super::user::required;
use super::User;

/// Practice details of a user registered with the doctor role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    pub user_uid: UserId,
    pub specialty: String,
    pub location: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields required to insert a doctor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDoctor {
    pub user_uid: UserId,
    pub specialty: String,
    pub location: String,
}

impl NewDoctor {
    pub fn new(
        user_uid: UserId,
        specialty: impl Into<String>,
        location: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            user_uid,
            specialty: required("specialty", specialty.into())?,
            location: required("location", location.into())?,
        })
    }

    pub fn into_doctor(self, now: Timestamp) -> Doctor {
        Doctor {
            user_uid: self.user_uid,
            specialty: self.specialty,
            location: self.location,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a doctor. An empty patch only refreshes `updated_at`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorPatch {
    pub specialty: Option<String>,
    pub location: Option<String>,
}

impl DoctorPatch {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(v) = &self.specialty {
            required("specialty", v.clone())?;
        }
        if let Some(v) = &self.location {
            required("location", v.clone())?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.specialty.is_none() && self.location.is_none()
    }

    pub fn apply_to(&self, doctor: &mut Doctor, now: Timestamp) {
        if let Some(v) = &self.specialty {
            doctor.specialty = v.clone();
        }
        if let Some(v) = &self.location {
            doctor.location = v.clone();
        }
        doctor.updated_at = now;
    }
}

/// Denormalized read view of a doctor joined with the owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub uid: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub specialty: String,
    pub location: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DoctorProfile {
    /// Joins a user with their doctor record. Timestamps come from the doctor.
    pub fn from_parts(user: &User, doctor: &Doctor) -> Self {
        Self {
            uid: user.uid.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            specialty: doctor.specialty.clone(),
            location: doctor.location.clone(),
            created_at: doctor.created_at,
            updated_at: doctor.updated_at,
        }
    }
}
