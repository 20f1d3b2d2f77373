//! User account records.

use crate::domain::foundation::{Timestamp, UserId, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role chosen at registration. Not changed afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Doctor,
    Patient,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Doctor => "doctor",
            UserRole::Patient => "patient",
        }
    }

    pub fn is_doctor(&self) -> bool {
        matches!(self, UserRole::Doctor)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "doctor" => Ok(UserRole::Doctor),
            "patient" => Ok(UserRole::Patient),
            other => Err(ValidationError::invalid_format(
                "user_type",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// A registered account, keyed by the identity provider's uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uid: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields required to insert a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub uid: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub avatar_url: Option<String>,
}

impl NewUser {
    /// Builds a new user record, rejecting blank names or a malformed email.
    pub fn new(
        uid: UserId,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        role: UserRole,
    ) -> Result<Self, ValidationError> {
        let first_name = required("first_name", first_name.into())?;
        let last_name = required("last_name", last_name.into())?;
        let email = validate_email(email.into())?;
        Ok(Self {
            uid,
            first_name,
            last_name,
            email,
            role,
            avatar_url: None,
        })
    }

    pub fn with_avatar(mut self, avatar_url: impl Into<String>) -> Self {
        self.avatar_url = Some(avatar_url.into());
        self
    }

    /// Materializes the stored record with both timestamps set to `now`.
    pub fn into_user(self, now: Timestamp) -> User {
        User {
            uid: self.uid,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            role: self.role,
            avatar_url: self.avatar_url,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial update of a user's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserPatch {
    /// Checks supplied fields the same way `NewUser::new` does.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.first_name {
            required("first_name", name.clone())?;
        }
        if let Some(name) = &self.last_name {
            required("last_name", name.clone())?;
        }
        if let Some(email) = &self.email {
            validate_email(email.clone())?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.avatar_url.is_none()
    }

    /// Applies the patch in place and refreshes `updated_at`.
    pub fn apply_to(&self, user: &mut User, now: Timestamp) {
        if let Some(v) = &self.first_name {
            user.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            user.last_name = v.clone();
        }
        if let Some(v) = &self.email {
            user.email = v.clone();
        }
        if let Some(v) = &self.avatar_url {
            user.avatar_url = Some(v.clone());
        }
        user.updated_at = now;
    }
}

pub(crate) fn required(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn validate_email(email: String) -> Result<String, ValidationError> {
    let email = required("email", email)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ValidationError::invalid_format(
            "email",
            "expected an address like name@example.com",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid() -> UserId {
        UserId::new("uid-1").unwrap()
    }

    #[test]
    fn new_user_trims_names() {
        let user = NewUser::new(uid(), "  Ada ", "Lovelace", "ada@example.com", UserRole::Patient)
            .unwrap();
        assert_eq!(user.first_name, "Ada");
    }

    #[test]
    fn new_user_rejects_blank_last_name() {
        let err = NewUser::new(uid(), "Ada", " ", "ada@example.com", UserRole::Patient)
            .unwrap_err();
        assert_eq!(err, ValidationError::empty_field("last_name"));
    }

    #[test]
    fn new_user_rejects_email_without_domain() {
        let err = NewUser::new(uid(), "Ada", "L", "ada@", UserRole::Patient).unwrap_err();
        assert_eq!(err.field(), "email");
    }

    #[test]
    fn role_parses_lowercase_names_only() {
        assert_eq!("doctor".parse::<UserRole>().unwrap(), UserRole::Doctor);
        assert_eq!("patient".parse::<UserRole>().unwrap(), UserRole::Patient);
        assert!("admin".parse::<UserRole>().is_err());
        assert!(serde_json::from_str::<UserRole>("\"nurse\"").is_err());
    }

    #[test]
    fn patch_applies_only_supplied_fields() {
        let created = Timestamp::now();
        let mut user = NewUser::new(uid(), "Ada", "L", "ada@example.com", UserRole::Patient)
            .unwrap()
            .into_user(created);
        let patch = UserPatch {
            last_name: Some("Lovelace".into()),
            ..Default::default()
        };
        let later = Timestamp::from_datetime(*created.as_datetime() + chrono::Duration::seconds(1));

        patch.apply_to(&mut user, later);

        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
        assert_eq!(user.created_at, created);
        assert_eq!(user.updated_at, later);
    }

    #[test]
    fn patch_validation_rejects_blank_email() {
        let patch = UserPatch {
            email: Some("".into()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(UserPatch::default().validate().is_ok());
        assert!(UserPatch::default().is_empty());
    }
}
