//! DeleteUserHandler - Removes a user and everything hanging off them.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::User;
use crate::ports::{IdentityProvider, UserRepository};

use super::get_user::user_not_found;

/// Command to delete a user.
///
/// `identity_token` is the caller's own session token. It is only set when
/// the caller deletes their own record, in which case the identity account
/// is removed as well.
#[derive(Debug, Clone)]
pub struct DeleteUserCommand {
    pub uid: UserId,
    pub identity_token: Option<String>,
}

pub struct DeleteUserHandler {
    users: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl DeleteUserHandler {
    pub fn new(users: Arc<dyn UserRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { users, identity }
    }

    pub async fn handle(&self, cmd: DeleteUserCommand) -> Result<User, DomainError> {
        let user = self
            .users
            .delete(&cmd.uid)
            .await?
            .ok_or_else(|| user_not_found(&cmd.uid))?;

        if let Some(token) = cmd.identity_token {
            if let Err(err) = self.identity.delete_account(&token).await {
                warn!(uid = %user.uid, error = %err, "Identity account not removed");
            }
        }

        info!(uid = %user.uid, "User deleted");
        Ok(user)
    }
}
