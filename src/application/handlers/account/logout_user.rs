//! LogoutUserHandler - Ends the caller's session.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::ports::IdentityProvider;

/// Command to sign out. The token is absent when the request carried no
/// session; logging out is still reported as successful.
#[derive(Debug, Clone, Default)]
pub struct LogoutUserCommand {
    pub id_token: Option<String>,
}

pub struct LogoutUserHandler {
    identity: Arc<dyn IdentityProvider>,
}

impl LogoutUserHandler {
    pub fn new(identity: Arc<dyn IdentityProvider>) -> Self {
        Self { identity }
    }

    pub async fn handle(&self, cmd: LogoutUserCommand) -> Result<(), DomainError> {
        if let Some(token) = cmd.id_token {
            self.identity.sign_out(&token).await?;
        }
        Ok(())
    }
}
