//! LoginUserHandler - Exchanges credentials for a session token.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::scheduling::User;
use crate::ports::{IdentityProvider, UserRepository};

#[derive(Debug, Clone)]
pub struct LoginUserCommand {
    pub email: String,
    pub password: String,
}

/// Signed-in user and the token to hand back as the session cookie.
#[derive(Debug, Clone)]
pub struct LoginUserResult {
    pub user: User,
    pub id_token: String,
}

pub struct LoginUserHandler {
    identity: Arc<dyn IdentityProvider>,
    users: Arc<dyn UserRepository>,
}

impl LoginUserHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>, users: Arc<dyn UserRepository>) -> Self {
        Self { identity, users }
    }

    pub async fn handle(&self, cmd: LoginUserCommand) -> Result<LoginUserResult, DomainError> {
        if cmd.email.trim().is_empty() {
            return Err(DomainError::validation("email", "Email is required"));
        }
        if cmd.password.is_empty() {
            return Err(DomainError::validation("password", "Password is required"));
        }

        let account = self.identity.sign_in(cmd.email.trim(), &cmd.password).await?;

        // The provider account can outlive a removed user record.
        let user = self.users.find_by_uid(&account.uid).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::UserNotFound,
                format!("User {} not found", account.uid),
            )
        })?;

        debug!(uid = %user.uid, "User signed in");
        Ok(LoginUserResult {
            user,
            id_token: account.id_token,
        })
    }
}
