//! Firebase Identity Toolkit adapter.
//!
//! Implements the `IdentityProvider` port against the Identity Toolkit REST
//! API (`accounts:signUp`, `accounts:signInWithPassword`,
//! `accounts:sendOobCode`, `accounts:delete`). Every call carries the web API
//! key as the `key` query parameter.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::domain::foundation::{IdentityAccount, IdentityError, UserId};
use crate::ports::IdentityProvider;

/// Identity Toolkit client.
pub struct FirebaseIdentityProvider {
    base_url: String,
    api_key: SecretString,
    http_client: reqwest::Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OobCodeRequest<'a> {
    request_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    id_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DeleteRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    email: String,
    id_token: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Discards the body of endpoints that return nothing useful.
#[derive(Deserialize)]
struct Ignored {}

impl FirebaseIdentityProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: SecretString,
    ) -> Result<Self, IdentityError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| IdentityError::Unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            http_client,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, IdentityError> {
        Self::new(
            config.identity_toolkit_url.clone(),
            config.firebase_api_key.clone(),
        )
    }

    async fn call<B, R>(&self, endpoint: &str, body: &B) -> Result<R, IdentityError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = format!("{}/accounts:{}", self.base_url, endpoint);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.expose_secret())])
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(endpoint, "Identity Toolkit request failed: {}", e);
                IdentityError::Unavailable(e.to_string())
            })?;

        let status = response.status();
        if status.is_success() {
            return response.json::<R>().await.map_err(|e| {
                tracing::error!(endpoint, "Failed to parse Identity Toolkit response: {}", e);
                IdentityError::Unavailable(format!("malformed response: {}", e))
            });
        }

        let message = match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => envelope.error.message,
            Err(_) => format!("HTTP {}", status),
        };
        tracing::debug!(endpoint, %status, message = %message, "Identity Toolkit rejected request");

        if status.is_server_error() {
            return Err(IdentityError::Unavailable(message));
        }
        Err(classify_error(&message))
    }

    fn into_account(response: AccountResponse) -> Result<IdentityAccount, IdentityError> {
        let uid = UserId::new(response.local_id)
            .map_err(|_| IdentityError::Rejected("provider returned an empty uid".to_string()))?;
        Ok(IdentityAccount {
            uid,
            email: response.email,
            id_token: response.id_token,
        })
    }
}

/// Maps an Identity Toolkit error message to the port's error.
///
/// Messages look like `EMAIL_EXISTS` or `WEAK_PASSWORD : Password should be
/// at least 6 characters`.
fn classify_error(message: &str) -> IdentityError {
    let (code, detail) = match message.split_once(" : ") {
        Some((code, detail)) => (code.trim(), detail.trim()),
        None => (message.trim(), ""),
    };

    match code {
        "EMAIL_EXISTS" => IdentityError::EmailExists,
        "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" | "USER_DISABLED" => {
            IdentityError::InvalidCredentials
        }
        "EMAIL_NOT_FOUND" | "USER_NOT_FOUND" => IdentityError::AccountNotFound,
        "WEAK_PASSWORD" => IdentityError::WeakPassword(if detail.is_empty() {
            "password rejected".to_string()
        } else {
            detail.to_string()
        }),
        _ => IdentityError::Rejected(message.to_string()),
    }
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<IdentityAccount, IdentityError> {
        let response: AccountResponse = self
            .call(
                "signUp",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        Self::into_account(response)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<IdentityAccount, IdentityError> {
        let response: AccountResponse = self
            .call(
                "signInWithPassword",
                &PasswordRequest {
                    email,
                    password,
                    return_secure_token: true,
                },
            )
            .await?;
        Self::into_account(response)
    }

    async fn sign_out(&self, _id_token: &str) -> Result<(), IdentityError> {
        // ID tokens are stateless; they lapse on expiry.
        tracing::debug!("Sign-out requested");
        Ok(())
    }

    async fn send_verification_email(&self, id_token: &str) -> Result<(), IdentityError> {
        let _: Ignored = self
            .call(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "VERIFY_EMAIL",
                    id_token: Some(id_token),
                    email: None,
                },
            )
            .await?;
        Ok(())
    }

    async fn send_password_reset_email(&self, email: &str) -> Result<(), IdentityError> {
        let _: Ignored = self
            .call(
                "sendOobCode",
                &OobCodeRequest {
                    request_type: "PASSWORD_RESET",
                    id_token: None,
                    email: Some(email),
                },
            )
            .await?;
        Ok(())
    }

    async fn delete_account(&self, id_token: &str) -> Result<(), IdentityError> {
        let _: Ignored = self.call("delete", &DeleteRequest { id_token }).await?;
        Ok(())
    }
}

impl std::fmt::Debug for FirebaseIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseIdentityProvider")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
