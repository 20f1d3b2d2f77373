//! Identity provider port for account management.
//!
//! Accounts, passwords and email flows live with the external provider. The
//! relational store only keeps the uid the provider hands back.

use async_trait::async_trait;

use crate::domain::foundation::{IdentityAccount, IdentityError};

/// Account operations delegated to the identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an email/password account.
    ///
    /// # Errors
    ///
    /// - `EmailExists` if the email is already registered with the provider
    /// - `WeakPassword` if the provider rejects the password
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, IdentityError>;

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// - `InvalidCredentials` on a wrong email or password
    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAccount, IdentityError>;

    /// End a session. Stateless tokens make this a no-op for some providers.
    async fn sign_out(&self, id_token: &str) -> Result<(), IdentityError>;

    /// Send the address-verification email for the account owning `id_token`.
    async fn send_verification_email(&self, id_token: &str) -> Result<(), IdentityError>;

    /// Send a password-reset email.
    async fn send_password_reset_email(&self, email: &str) -> Result<(), IdentityError>;

    /// Remove the account owning `id_token`.
    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError>;
}
