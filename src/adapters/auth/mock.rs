//! Mock authentication adapters for testing.
//!
//! These adapters implement the `SessionValidator` and `IdentityProvider`
//! ports without talking to Firebase.
//!
//! # Example
//!
//! ```ignore
//! use doctor_visit::adapters::auth::{MockIdentityProvider, MockSessionValidator};
//!
//! let identity = MockIdentityProvider::new();
//! let account = identity.create_account("dr@example.com", "secret-pw").await?;
//!
//! // Tokens issued by the mock provider validate through the linked validator
//! let validator = identity.session_validator();
//! assert!(validator.validate(&account.id_token).await.is_ok());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::foundation::{
    AuthError, AuthenticatedUser, IdentityAccount, IdentityError, UserId,
};
use crate::ports::{IdentityProvider, SessionValidator};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Mock session validator for testing.
///
/// Stores a map of tokens to users. Tokens not in the map return `InvalidToken`.
#[derive(Debug, Default, Clone)]
pub struct MockSessionValidator {
    tokens: Arc<Mutex<HashMap<String, AuthenticatedUser>>>,
    force_error: Arc<Mutex<Option<AuthError>>>,
}

impl MockSessionValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.add_token(token, user);
        self
    }

    /// Adds a valid token for a verified user with a generated email.
    ///
    /// Blank user ids are ignored.
    pub fn with_test_user(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        let email = format!("{}@test.example.com", user_id);
        match UserId::new(user_id) {
            Ok(id) => self.with_user(token, AuthenticatedUser::new(id, email, true)),
            Err(_) => self,
        }
    }

    /// Forces all validations to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *lock(&self.force_error) = Some(error);
        self
    }

    pub fn clear_error(&self) {
        *lock(&self.force_error) = None;
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, user: AuthenticatedUser) {
        lock(&self.tokens).insert(token.into(), user);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        lock(&self.tokens).remove(token);
    }

    pub fn token_count(&self) -> usize {
        lock(&self.tokens).len()
    }
}

#[async_trait]
impl SessionValidator for MockSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        if let Some(error) = lock(&self.force_error).clone() {
            return Err(error);
        }

        lock(&self.tokens)
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}

#[derive(Debug, Clone)]
struct MockAccount {
    uid: UserId,
    password: String,
}

#[derive(Debug, Default)]
struct IdentityState {
    accounts: HashMap<String, MockAccount>,
    next_uid: u64,
    verification_emails: Vec<String>,
    reset_emails: Vec<String>,
    deleted: Vec<UserId>,
    force_error: Option<IdentityError>,
}

/// In-process identity provider for testing.
///
/// Accounts are keyed by lowercase email. Every issued token is registered
/// with the linked `MockSessionValidator`, so a token from `sign_in` passes
/// the auth middleware in integration tests.
#[derive(Debug, Clone, Default)]
pub struct MockIdentityProvider {
    state: Arc<Mutex<IdentityState>>,
    validator: MockSessionValidator,
}

impl MockIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validator that accepts every token this provider has issued.
    pub fn session_validator(&self) -> MockSessionValidator {
        self.validator.clone()
    }

    /// Forces every account operation to return the specified error.
    pub fn with_error(self, error: IdentityError) -> Self {
        self.set_error(error);
        self
    }

    /// Runtime counterpart of `with_error`.
    pub fn set_error(&self, error: IdentityError) {
        lock(&self.state).force_error = Some(error);
    }

    pub fn clear_error(&self) {
        lock(&self.state).force_error = None;
    }

    /// Emails that received a verification message, in send order.
    pub fn verification_emails(&self) -> Vec<String> {
        lock(&self.state).verification_emails.clone()
    }

    /// Emails that received a password-reset message, in send order.
    pub fn reset_emails(&self) -> Vec<String> {
        lock(&self.state).reset_emails.clone()
    }

    /// Uids of accounts removed through `delete_account`.
    pub fn deleted_accounts(&self) -> Vec<UserId> {
        lock(&self.state).deleted.clone()
    }

    pub fn account_count(&self) -> usize {
        lock(&self.state).accounts.len()
    }

    fn issue_token(&self, uid: &UserId, email: &str) -> String {
        let token = format!("mock-token-{}", uid);
        self.validator
            .add_token(token.clone(), AuthenticatedUser::new(uid.clone(), email, false));
        token
    }

    fn account_for_token(&self, id_token: &str) -> Option<(String, UserId)> {
        let state = lock(&self.state);
        state
            .accounts
            .iter()
            .find(|(_, account)| format!("mock-token-{}", account.uid) == id_token)
            .map(|(email, account)| (email.clone(), account.uid.clone()))
    }

    fn check_forced(&self) -> Result<(), IdentityError> {
        match &lock(&self.state).force_error {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, IdentityError> {
        self.check_forced()?;
        if password.len() < 6 {
            return Err(IdentityError::WeakPassword(
                "Password should be at least 6 characters".to_string(),
            ));
        }

        let key = email.to_lowercase();
        let uid = {
            let mut state = lock(&self.state);
            if state.accounts.contains_key(&key) {
                return Err(IdentityError::EmailExists);
            }
            state.next_uid += 1;
            let uid = UserId::new(format!("uid-{}", state.next_uid))
                .map_err(|e| IdentityError::Rejected(e.to_string()))?;
            state.accounts.insert(
                key,
                MockAccount {
                    uid: uid.clone(),
                    password: password.to_string(),
                },
            );
            uid
        };

        let id_token = self.issue_token(&uid, email);
        Ok(IdentityAccount {
            uid,
            email: email.to_string(),
            id_token,
        })
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAccount, IdentityError> {
        self.check_forced()?;
        let account = lock(&self.state)
            .accounts
            .get(&email.to_lowercase())
            .cloned()
            .ok_or(IdentityError::InvalidCredentials)?;
        if account.password != password {
            return Err(IdentityError::InvalidCredentials);
        }

        let id_token = self.issue_token(&account.uid, email);
        Ok(IdentityAccount {
            uid: account.uid,
            email: email.to_string(),
            id_token,
        })
    }

    async fn sign_out(&self, id_token: &str) -> Result<(), IdentityError> {
        self.check_forced()?;
        self.validator.remove_token(id_token);
        Ok(())
    }

    async fn send_verification_email(&self, id_token: &str) -> Result<(), IdentityError> {
        self.check_forced()?;
        let (email, _) = self
            .account_for_token(id_token)
            .ok_or_else(|| IdentityError::Rejected("INVALID_ID_TOKEN".to_string()))?;
        lock(&self.state).verification_emails.push(email);
        Ok(())
    }

    async fn send_password_reset_email(&self, email: &str) -> Result<(), IdentityError> {
        self.check_forced()?;
        let mut state = lock(&self.state);
        if !state.accounts.contains_key(&email.to_lowercase()) {
            return Err(IdentityError::AccountNotFound);
        }
        state.reset_emails.push(email.to_string());
        Ok(())
    }

    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError> {
        self.check_forced()?;
        let (email, uid) = self
            .account_for_token(id_token)
            .ok_or_else(|| IdentityError::Rejected("INVALID_ID_TOKEN".to_string()))?;
        {
            let mut state = lock(&self.state);
            state.accounts.remove(&email);
            state.deleted.push(uid);
        }
        self.validator.remove_token(id_token);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-123").unwrap(), "test@example.com", true)
    }

    // ════════════════════════════════════════════════════════════════════════════
    // MockSessionValidator Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn mock_validator_returns_user_for_registered_token() {
        let validator = MockSessionValidator::new().with_user("valid-token", test_user());

        let user = validator.validate("valid-token").await.unwrap();

        assert_eq!(user.id.as_str(), "user-123");
        assert_eq!(user.email, "test@example.com");
    }

    #[tokio::test]
    async fn mock_validator_returns_invalid_token_for_unknown() {
        let validator = MockSessionValidator::new();

        let result = validator.validate("unknown-token").await;

        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[tokio::test]
    async fn mock_validator_with_error_forces_error() {
        let validator = MockSessionValidator::new()
            .with_user("valid-token", test_user())
            .with_error(AuthError::ServiceUnavailable("Test error".to_string()));

        assert!(matches!(
            validator.validate("valid-token").await,
            Err(AuthError::ServiceUnavailable(_))
        ));

        validator.clear_error();
        assert!(validator.validate("valid-token").await.is_ok());
    }

    #[tokio::test]
    async fn mock_validator_remove_token_invalidates() {
        let validator = MockSessionValidator::new().with_user("token", test_user());
        assert!(validator.validate("token").await.is_ok());

        validator.remove_token("token");

        assert!(validator.validate("token").await.is_err());
    }

    #[test]
    fn mock_validator_token_count_tracks_tokens() {
        let validator = MockSessionValidator::new()
            .with_test_user("t1", "u1")
            .with_test_user("t2", "u2");

        assert_eq!(validator.token_count(), 2);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // MockIdentityProvider Tests
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn created_account_token_validates() {
        let identity = MockIdentityProvider::new();
        let account = identity
            .create_account("dr.house@example.com", "vicodin1")
            .await
            .unwrap();

        let user = identity
            .session_validator()
            .validate(&account.id_token)
            .await
            .unwrap();
        assert_eq!(user.id, account.uid);
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected_case_insensitively() {
        let identity = MockIdentityProvider::new();
        identity.create_account("a@example.com", "password").await.unwrap();

        let result = identity.create_account("A@Example.com", "password").await;

        assert_eq!(result.unwrap_err(), IdentityError::EmailExists);
    }

    #[tokio::test]
    async fn short_password_is_weak() {
        let identity = MockIdentityProvider::new();
        let result = identity.create_account("a@example.com", "123").await;
        assert!(matches!(result, Err(IdentityError::WeakPassword(_))));
    }

    #[tokio::test]
    async fn sign_in_checks_password() {
        let identity = MockIdentityProvider::new();
        identity.create_account("a@example.com", "password").await.unwrap();

        assert!(identity.sign_in("a@example.com", "password").await.is_ok());
        assert_eq!(
            identity.sign_in("a@example.com", "wrong").await.unwrap_err(),
            IdentityError::InvalidCredentials
        );
        assert_eq!(
            identity.sign_in("nobody@example.com", "password").await.unwrap_err(),
            IdentityError::InvalidCredentials
        );
    }

    #[tokio::test]
    async fn sign_out_revokes_token() {
        let identity = MockIdentityProvider::new();
        let account = identity.create_account("a@example.com", "password").await.unwrap();

        identity.sign_out(&account.id_token).await.unwrap();

        assert!(identity
            .session_validator()
            .validate(&account.id_token)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn emails_are_recorded() {
        let identity = MockIdentityProvider::new();
        let account = identity.create_account("a@example.com", "password").await.unwrap();

        identity.send_verification_email(&account.id_token).await.unwrap();
        identity.send_password_reset_email("a@example.com").await.unwrap();

        assert_eq!(identity.verification_emails(), vec!["a@example.com"]);
        assert_eq!(identity.reset_emails(), vec!["a@example.com"]);
        assert_eq!(
            identity.send_password_reset_email("nobody@example.com").await,
            Err(IdentityError::AccountNotFound)
        );
    }

    #[tokio::test]
    async fn delete_account_removes_and_records() {
        let identity = MockIdentityProvider::new();
        let account = identity.create_account("a@example.com", "password").await.unwrap();

        identity.delete_account(&account.id_token).await.unwrap();

        assert_eq!(identity.account_count(), 0);
        assert_eq!(identity.deleted_accounts(), vec![account.uid]);
        assert!(identity.sign_in("a@example.com", "password").await.is_err());
    }

    #[tokio::test]
    async fn forced_error_applies_to_all_operations() {
        let identity = MockIdentityProvider::new()
            .with_error(IdentityError::Unavailable("down".to_string()));

        assert!(matches!(
            identity.create_account("a@example.com", "password").await,
            Err(IdentityError::Unavailable(_))
        ));
        assert!(identity.send_password_reset_email("a@example.com").await.is_err());

        identity.clear_error();
        assert!(identity.create_account("a@example.com", "password").await.is_ok());
    }
}
