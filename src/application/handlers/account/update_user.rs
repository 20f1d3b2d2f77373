//! UpdateUserHandler - Partial update of a user's profile fields.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::{User, UserPatch};
use crate::ports::UserRepository;

use super::get_user::user_not_found;

#[derive(Debug, Clone)]
pub struct UpdateUserCommand {
    pub uid: UserId,
    pub patch: UserPatch,
}

pub struct UpdateUserHandler {
    users: Arc<dyn UserRepository>,
}

impl UpdateUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, cmd: UpdateUserCommand) -> Result<User, DomainError> {
        cmd.patch.validate()?;

        self.users
            .update(&cmd.uid, cmd.patch)
            .await?
            .ok_or_else(|| user_not_found(&cmd.uid))
    }
}
