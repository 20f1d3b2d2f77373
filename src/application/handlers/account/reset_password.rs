//! ResetPasswordHandler - Sends a password-reset email.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{DomainError, IdentityError};
use crate::ports::IdentityProvider;

#[derive(Debug, Clone)]
pub struct ResetPasswordCommand {
    pub email: String,
}

pub struct ResetPasswordHandler {
    identity: Arc<dyn IdentityProvider>,
}

impl ResetPasswordHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    /// Unknown emails succeed silently so the endpoint cannot be used to
    /// probe for accounts.
    pub async fn handle(&self, cmd: ResetPasswordCommand) -> Result<(), DomainError> {
        let email = cmd.email.trim();
        if email.is_empty() {
            return Err(DomainError::validation("email", "Email is required"));
        }

        match self.identity.send_password_reset_email(email).await {
            Ok(()) => Ok(()),
            Err(IdentityError::AccountNotFound) => {
                debug!("Password reset requested for unknown email");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
