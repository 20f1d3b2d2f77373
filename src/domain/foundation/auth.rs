//! Authentication types for the domain layer.
//!
//! These types describe the caller identity established by the identity
//! provider. They have **no provider dependencies**: the Firebase adapter and
//! the mocks populate them through the `SessionValidator` and
//! `IdentityProvider` ports.

use super::{DomainError, ErrorCode, UserId};
use thiserror::Error;

/// Authenticated user extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// The unique user identifier from the identity provider.
    pub id: UserId,

    /// User's email address from the token claims.
    pub email: String,

    /// Whether the identity provider has verified the email address.
    pub email_verified: bool,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, email: impl Into<String>, email_verified: bool) -> Self {
        Self {
            id,
            email: email.into(),
            email_verified,
        }
    }
}

/// Account handle returned by the identity provider after sign-up or sign-in.
#[derive(Debug, Clone)]
pub struct IdentityAccount {
    /// Provider-issued user identifier, used as the relational key.
    pub uid: UserId,

    /// Email the account is registered under.
    pub email: String,

    /// Short-lived session token for the account.
    pub id_token: String,
}

/// Session token validation errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this error indicates the user should sign in again.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self, AuthError::InvalidToken | AuthError::TokenExpired)
    }
}

/// Failures reported by the identity provider account operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error("Email is already registered")]
    EmailExists,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Password is too weak: {0}")]
    WeakPassword(String),

    #[error("No account for this email")]
    AccountNotFound,

    #[error("Identity provider rejected the request: {0}")]
    Rejected(String),

    #[error("Identity provider unavailable: {0}")]
    Unavailable(String),
}

impl From<IdentityError> for DomainError {
    fn from(err: IdentityError) -> Self {
        let code = match &err {
            IdentityError::EmailExists => ErrorCode::EmailAlreadyRegistered,
            IdentityError::InvalidCredentials | IdentityError::AccountNotFound => {
                ErrorCode::InvalidCredentials
            }
            IdentityError::WeakPassword(_) => ErrorCode::ValidationFailed,
            IdentityError::Rejected(_) | IdentityError::Unavailable(_) => {
                ErrorCode::IdentityProviderError
            }
        };
        DomainError::new(code, err.to_string())
    }
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        let code = match &err {
            AuthError::InvalidToken | AuthError::TokenExpired => ErrorCode::Unauthorized,
            AuthError::ServiceUnavailable(_) => ErrorCode::IdentityProviderError,
        };
        DomainError::new(code, err.to_string())
    }
}
