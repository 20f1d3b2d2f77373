//! Sign-up request validated before any account is created.

use crate::domain::foundation::{UserId, ValidationError};

use super::user::{required, validate_email};
use super::{NewDoctor, NewUser, UserRole};

/// Practice details a doctor supplies at sign-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeDetails {
    pub specialty: String,
    pub location: String,
}

/// A fully validated registration.
///
/// Holds everything needed to create the identity account, the user record
/// and, for doctors, the doctor record. The uid is only known once the
/// identity provider has created the account.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub practice: Option<PracticeDetails>,
}

impl Registration {
    /// Validates every field up front.
    ///
    /// Doctors must supply a specialty and a location; for patients both are
    /// ignored.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        role: UserRole,
        specialty: Option<String>,
        location: Option<String>,
    ) -> Result<Self, ValidationError> {
        let email = validate_email(email.into())?;
        let password = password.into();
        if password.is_empty() {
            return Err(ValidationError::empty_field("password"));
        }
        let first_name = required("first_name", first_name.into())?;
        let last_name = required("last_name", last_name.into())?;

        let practice = if role.is_doctor() {
            Some(PracticeDetails {
                specialty: required("specialty", specialty.unwrap_or_default())?,
                location: required("location", location.unwrap_or_default())?,
            })
        } else {
            None
        };

        Ok(Self {
            email,
            password,
            first_name,
            last_name,
            role,
            practice,
        })
    }

    pub fn user_record(&self, uid: UserId) -> NewUser {
        NewUser {
            uid,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            role: self.role,
            avatar_url: None,
        }
    }

    /// Doctor record for doctor registrations, `None` for patients.
    pub fn doctor_record(&self, uid: UserId) -> Option<NewDoctor> {
        self.practice.as_ref().map(|p| NewDoctor {
            user_uid: uid,
            specialty: p.specialty.clone(),
            location: p.location.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doctor(specialty: Option<&str>, location: Option<&str>) -> Result<Registration, ValidationError> {
        Registration::new(
            "house@example.com",
            "vicodin1",
            "Gregory",
            "House",
            UserRole::Doctor,
            specialty.map(String::from),
            location.map(String::from),
        )
    }

    #[test]
    fn doctor_needs_specialty_and_location() {
        assert_eq!(doctor(None, Some("New York")).unwrap_err().field(), "specialty");
        assert_eq!(doctor(Some("Cardiology"), Some("  ")).unwrap_err().field(), "location");
        assert!(doctor(Some("Cardiology"), Some("New York")).is_ok());
    }

    #[test]
    fn patient_ignores_practice_details() {
        let reg = Registration::new(
            "pat@example.com",
            "secret1",
            "Pat",
            "Smith",
            UserRole::Patient,
            Some("Cardiology".to_string()),
            None,
        )
        .unwrap();

        assert!(reg.practice.is_none());
        assert!(reg.doctor_record(UserId::new("uid-1").unwrap()).is_none());
    }

    #[test]
    fn password_is_required() {
        let err = Registration::new("a@b.co", "", "A", "B", UserRole::Patient, None, None)
            .unwrap_err();
        assert_eq!(err.field(), "password");
    }

    #[test]
    fn malformed_email_is_rejected() {
        let err = Registration::new("nope", "pw", "A", "B", UserRole::Patient, None, None)
            .unwrap_err();
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn records_carry_assigned_uid() {
        let reg = doctor(Some("Cardiology"), Some("New York")).unwrap();
        let uid = UserId::new("fb-uid").unwrap();

        let user = reg.user_record(uid.clone());
        let doc = reg.doctor_record(uid.clone()).unwrap();

        assert_eq!(user.uid, uid);
        assert_eq!(user.role, UserRole::Doctor);
        assert_eq!(doc.user_uid, uid);
        assert_eq!(doc.specialty, "Cardiology");
    }
}
