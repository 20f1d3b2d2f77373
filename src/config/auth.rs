//! Identity provider configuration (Firebase Authentication)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Identity provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Firebase project id. Used as the expected token audience and to
    /// derive the expected issuer.
    pub firebase_project_id: String,

    /// Web API key for the Identity Toolkit REST API
    pub firebase_api_key: SecretString,

    /// Identity Toolkit base URL
    #[serde(default = "default_identity_toolkit_url")]
    pub identity_toolkit_url: String,

    /// JWKS endpoint publishing the ID token signing keys
    #[serde(default = "default_jwks_url")]
    pub jwks_url: String,

    /// JWKS cache TTL in seconds
    #[serde(default = "default_jwks_cache_ttl")]
    pub jwks_cache_ttl_secs: u64,
}

impl AuthConfig {
    pub fn jwks_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.jwks_cache_ttl_secs)
    }

    /// Issuer claim expected on ID tokens for this project.
    pub fn expected_issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.firebase_project_id)
    }

    /// Validate identity provider configuration
    ///
    /// In production, requires HTTPS for both provider URLs.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.firebase_project_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__FIREBASE_PROJECT_ID"));
        }
        if self.firebase_api_key.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__FIREBASE_API_KEY"));
        }
        if *environment == Environment::Production
            && !(self.identity_toolkit_url.starts_with("https://")
                && self.jwks_url.starts_with("https://"))
        {
            return Err(ValidationError::IdentityUrlMustBeHttps);
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            firebase_project_id: String::new(),
            firebase_api_key: SecretString::new(String::new()),
            identity_toolkit_url: default_identity_toolkit_url(),
            jwks_url: default_jwks_url(),
            jwks_cache_ttl_secs: default_jwks_cache_ttl(),
        }
    }
}

fn default_identity_toolkit_url() -> String {
    "https://identitytoolkit.googleapis.com/v1".to_string()
}

fn default_jwks_url() -> String {
    "https://www.googleapis.com/service_accounts/v1/jwk/securetoken@system.gserviceaccount.com"
        .to_string()
}

fn default_jwks_cache_ttl() -> u64 {
    3600
}
