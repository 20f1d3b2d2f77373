//! Firebase ID token validator.
//!
//! Implements the `SessionValidator` port for tokens issued by Firebase
//! Authentication. Validation:
//!
//! 1. Fetch Google's securetoken JWKS (cached for the configured TTL)
//! 2. Verify the RS256 signature against the key named by `kid`
//! 3. Check issuer `https://securetoken.google.com/<project>`, audience
//!    `<project>` and expiry
//! 4. Map claims to the domain `AuthenticatedUser`

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{
    decode, decode_header, jwk::JwkSet, Algorithm, DecodingKey, TokenData, Validation,
};
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::config::AuthConfig;
use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Settings for the Firebase token validator.
#[derive(Debug, Clone)]
pub struct FirebaseTokenConfig {
    /// Firebase project id, the expected audience.
    pub project_id: String,

    /// JWKS endpoint.
    pub jwks_url: String,

    /// How long fetched keys are reused.
    pub jwks_cache_duration: Duration,
}

impl FirebaseTokenConfig {
    pub fn issuer(&self) -> String {
        format!("https://securetoken.google.com/{}", self.project_id)
    }
}

impl From<&AuthConfig> for FirebaseTokenConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            project_id: config.firebase_project_id.clone(),
            jwks_url: config.jwks_url.clone(),
            jwks_cache_duration: config.jwks_cache_ttl(),
        }
    }
}

/// Claims carried by a Firebase ID token.
#[derive(Debug, Deserialize)]
struct FirebaseClaims {
    /// Subject, the Firebase uid
    sub: String,

    iss: String,

    aud: String,

    #[allow(dead_code)]
    exp: i64,

    #[serde(default)]
    email: Option<String>,

    #[serde(default)]
    email_verified: Option<bool>,
}

/// Cached JWKS with expiry tracking.
struct JwksCache {
    jwks: JwkSet,
    fetched_at: Instant,
    cache_duration: Duration,
}

impl JwksCache {
    fn new(jwks: JwkSet, cache_duration: Duration) -> Self {
        Self {
            jwks,
            fetched_at: Instant::now(),
            cache_duration,
        }
    }

    fn is_expired(&self) -> bool {
        self.fetched_at.elapsed() > self.cache_duration
    }
}

/// Validates Firebase ID tokens against Google's published signing keys.
pub struct FirebaseSessionValidator {
    config: FirebaseTokenConfig,
    issuer: String,
    http_client: reqwest::Client,
    jwks_cache: Arc<RwLock<Option<JwksCache>>>,
}

impl FirebaseSessionValidator {
    /// Creates the validator. Keys are fetched lazily on first use.
    pub fn new(config: FirebaseTokenConfig) -> Result<Self, AuthError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AuthError::service_unavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            issuer: config.issuer(),
            config,
            http_client,
            jwks_cache: Arc::new(RwLock::new(None)),
        })
    }

    async fn fetch_jwks(&self) -> Result<JwkSet, AuthError> {
        tracing::debug!(url = %self.config.jwks_url, "Fetching JWKS");

        let response = self
            .http_client
            .get(&self.config.jwks_url)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch JWKS: {}", e);
                AuthError::service_unavailable(format!("Failed to fetch JWKS: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::error!("JWKS endpoint returned {}", status);
            return Err(AuthError::service_unavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        let jwks: JwkSet = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse JWKS: {}", e);
            AuthError::service_unavailable(format!("Failed to parse JWKS: {}", e))
        })?;

        tracing::debug!("Fetched {} keys from JWKS", jwks.keys.len());
        Ok(jwks)
    }

    /// Get JWKS, using cache if available and not expired.
    async fn get_jwks(&self) -> Result<JwkSet, AuthError> {
        {
            let cache = self.jwks_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if !cached.is_expired() {
                    return Ok(cached.jwks.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        *self.jwks_cache.write().await =
            Some(JwksCache::new(jwks.clone(), self.config.jwks_cache_duration));
        Ok(jwks)
    }

    fn validate_token(
        &self,
        token: &str,
        decoding_key: &DecodingKey,
    ) -> Result<TokenData<FirebaseClaims>, AuthError> {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.config.project_id]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        decode::<FirebaseClaims>(token, decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })
    }
}

/// Finds the RS256 key named by the token header.
fn find_decoding_key(header: &jsonwebtoken::Header, jwks: &JwkSet) -> Result<DecodingKey, AuthError> {
    if header.alg != Algorithm::RS256 {
        tracing::warn!("Unexpected token algorithm: {:?}", header.alg);
        return Err(AuthError::InvalidToken);
    }

    let kid = header.kid.as_ref().ok_or_else(|| {
        tracing::warn!("JWT missing 'kid' header");
        AuthError::InvalidToken
    })?;

    let jwk = jwks.find(kid).ok_or_else(|| {
        tracing::warn!("No matching key found for kid: {}", kid);
        AuthError::InvalidToken
    })?;

    DecodingKey::from_jwk(jwk).map_err(|e| {
        tracing::warn!("Failed to create decoding key: {}", e);
        AuthError::InvalidToken
    })
}

#[async_trait]
impl SessionValidator for FirebaseSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let header = decode_header(token).map_err(|e| {
            tracing::debug!("Failed to decode JWT header: {}", e);
            AuthError::InvalidToken
        })?;

        let jwks = self.get_jwks().await?;
        let decoding_key = find_decoding_key(&header, &jwks)?;
        let claims = self.validate_token(token, &decoding_key)?.claims;

        if claims.iss != self.issuer || claims.aud != self.config.project_id {
            return Err(AuthError::InvalidToken);
        }

        let email = claims.email.ok_or_else(|| {
            tracing::warn!("Token missing email claim");
            AuthError::InvalidToken
        })?;

        let user_id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthenticatedUser::new(
            user_id,
            email,
            claims.email_verified.unwrap_or(false),
        ))
    }
}

impl std::fmt::Debug for FirebaseSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseSessionValidator")
            .field("project_id", &self.config.project_id)
            .field("jwks_url", &self.config.jwks_url)
            .finish_non_exhaustive()
    }
}
