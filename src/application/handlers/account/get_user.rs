//! GetUserHandler - Query handler for a single user record.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, UserId};
use crate::domain::scheduling::User;
use crate::ports::UserRepository;

#[derive(Debug, Clone)]
pub struct GetUserQuery {
    pub uid: UserId,
}

pub struct GetUserHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    pub async fn handle(&self, query: GetUserQuery) -> Result<User, DomainError> {
        self.users
            .find_by_uid(&query.uid)
            .await?
            .ok_or_else(|| user_not_found(&query.uid))
    }
}

pub(crate) fn user_not_found(uid: &UserId) -> DomainError {
    DomainError::new(ErrorCode::UserNotFound, format!("User {} not found", uid))
        .with_detail("uid", uid.to_string())
}
