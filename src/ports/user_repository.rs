//! User repository port.
//!
//! Users are keyed by the uid issued by the identity provider, so the
//! relational record and the provider account share one identifier.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::scheduling::{NewUser, User, UserPatch};
use async_trait::async_trait;

/// Repository port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Both timestamps are set to now.
    ///
    /// # Errors
    ///
    /// - `EmailAlreadyRegistered` if the email (or uid) is already taken
    /// - `DatabaseError` on persistence failure
    async fn create(&self, user: NewUser) -> Result<User, DomainError>;

    /// Find a user by uid. Returns `None` if not found.
    async fn find_by_uid(&self, uid: &UserId) -> Result<Option<User>, DomainError>;

    /// Apply a partial update. Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// - `EmailAlreadyRegistered` if the new email belongs to another user
    /// - `DatabaseError` on persistence failure
    async fn update(&self, uid: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError>;

    /// Delete a user together with their doctor record, slots and
    /// appointments. Returns the removed user, or `None` if not found.
    async fn delete(&self, uid: &UserId) -> Result<Option<User>, DomainError>;
}
