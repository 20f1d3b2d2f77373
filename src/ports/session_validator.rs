//! Session validation port.
//!
//! Provider-agnostic contract for turning a session token into a caller
//! identity. Implementations exist for Firebase ID tokens and for tests.
//!
//! All implementations MUST validate:
//! - **Issuer (iss)**: Token must come from the expected project
//! - **Audience (aud)**: Token must be intended for this application
//! - **Expiry (exp)**: Token must not be expired

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates session tokens and extracts user identity.
///
/// HTTP middleware reads the token from the `access_token` cookie or a
/// Bearer header and calls this port.
///
/// # Contract
///
/// - Return `AuthError::InvalidToken` for malformed/bad signature tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
