//! HTTP DTOs for account endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{UserId, ValidationError};
use crate::domain::scheduling::{Doctor, Registration, User, UserPatch, UserRole};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Sign-up request. Missing text fields arrive as empty strings so that
/// validation can name the offending field.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default, alias = "user_type")]
    pub role: Option<UserRole>,
    #[serde(default)]
    pub specialty: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

impl RegisterUserRequest {
    pub fn into_registration(self) -> Result<Registration, ValidationError> {
        let role = self.role.ok_or_else(|| ValidationError::empty_field("role"))?;
        Registration::new(
            self.email,
            self.password,
            self.first_name,
            self.last_name,
            role,
            self.specialty,
            self.location,
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
}

/// Partial user update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<UpdateUserRequest> for UserPatch {
    fn from(req: UpdateUserRequest) -> Self {
        UserPatch {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            avatar_url: req.avatar_url,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct RegisterUserResponse {
    pub message: String,
    pub user: User,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<Doctor>,
}

/// The identity returned after sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct SignedInUser {
    pub uid: UserId,
    pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: SignedInUser,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_accepts_user_type_alias() {
        let req: RegisterUserRequest = serde_json::from_str(
            r#"{
                "email": "grey@example.com",
                "password": "secret-pw",
                "first_name": "Meredith",
                "last_name": "Grey",
                "user_type": "doctor",
                "specialty": "Cardiology",
                "location": "New York"
            }"#,
        )
        .unwrap();

        let registration = req.into_registration().unwrap();
        assert_eq!(registration.role, UserRole::Doctor);
        assert!(registration.practice.is_some());
    }

    #[test]
    fn missing_role_names_the_field() {
        let req: RegisterUserRequest = serde_json::from_str(
            r#"{"email": "a@example.com", "password": "pw", "first_name": "A", "last_name": "B"}"#,
        )
        .unwrap();

        let err = req.into_registration().unwrap_err();
        assert_eq!(err.field(), "role");
    }

    #[test]
    fn missing_first_name_is_reported_by_registration() {
        let req: RegisterUserRequest = serde_json::from_str(
            r#"{"email": "a@example.com", "password": "pw", "last_name": "B", "role": "patient"}"#,
        )
        .unwrap();

        assert_eq!(req.into_registration().unwrap_err().field(), "first_name");
    }

    #[test]
    fn update_request_maps_to_patch() {
        let req: UpdateUserRequest =
            serde_json::from_str(r#"{"last_name": "Shepherd"}"#).unwrap();
        let patch: UserPatch = req.into();

        assert_eq!(patch.last_name.as_deref(), Some("Shepherd"));
        assert!(patch.first_name.is_none());
    }

    #[test]
    fn login_response_serializes_uid_and_email() {
        let body = LoginResponse {
            message: "User logged in successfully!".to_string(),
            user: SignedInUser {
                uid: UserId::new("uid-1").unwrap(),
                email: "a@example.com".to_string(),
            },
        };
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["user"]["uid"], "uid-1");
        assert_eq!(json["user"]["email"], "a@example.com");
    }
}
