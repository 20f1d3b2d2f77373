//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that validates the session token and injects the caller
//! - `RequireAuth` - Extractor that requires authentication
//! - `SessionToken` - Extractor for the raw, validated session token
//!
//! # Architecture
//!
//! The middleware uses the `SessionValidator` port, keeping it provider-agnostic.
//! Firebase in production and the mock validator in tests look the same here.
//!
//! ```text
//! Request → auth_middleware → injects AuthenticatedUser into extensions
//!                                      ↓
//!                              Handler → RequireAuth extractor reads from extensions
//! ```
//!
//! A rejected token does not fail the request in the middleware. The failure
//! is recorded and `RequireAuth` reports it, so public routes such as login
//! keep working for a browser still holding an expired cookie.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

use crate::adapters::http::error::ApiError;
use crate::domain::foundation::{AuthError, AuthenticatedUser, DomainError, ErrorCode};
use crate::ports::SessionValidator;

use super::cookie::session_cookie_value;

/// Auth middleware state - wraps the session validator.
pub type AuthState = Arc<dyn SessionValidator>;

/// Token that passed validation for the current request.
#[derive(Debug, Clone)]
struct ValidatedToken(String);

/// Validation failure for the token presented with the current request.
#[derive(Debug, Clone)]
struct RejectedToken(AuthError);

/// Reads the session token from the `access_token` cookie, falling back to
/// an `Authorization: Bearer` header.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    session_cookie_value(headers).or_else(|| {
        headers
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    })
}

/// Authentication middleware.
///
/// 1. Extracts the session token (cookie first, then Bearer header)
/// 2. Validates it using the `SessionValidator` port
/// 3. On success, injects `AuthenticatedUser` into request extensions
/// 4. On missing token, continues without injecting
/// 5. On a rejected token, records the failure for `RequireAuth`
pub async fn auth_middleware(
    State(validator): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = extract_session_token(request.headers()) {
        match validator.validate(&token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                request.extensions_mut().insert(ValidatedToken(token));
            }
            Err(e) => {
                match &e {
                    AuthError::ServiceUnavailable(msg) => {
                        error!("Auth service unavailable: {}", msg);
                    }
                    other => debug!("Session token rejected: {}", other),
                }
                request.extensions_mut().insert(RejectedToken(e));
            }
        }
    }
    next.run(request).await
}

/// Extractor that requires authentication.
///
/// If no user is in the request extensions (i.e., auth middleware didn't
/// successfully validate a token), the request is rejected with 401, or 502
/// when the token could not be checked at all.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
                return Ok(RequireAuth(user.clone()));
            }
            match parts.extensions.get::<RejectedToken>() {
                Some(RejectedToken(e)) => Err(AuthRejection::Rejected(e.clone())),
                None => Err(AuthRejection::Unauthenticated),
            }
        })
    }
}

/// Extractor for the session token of an authenticated request.
///
/// `None` when no token was sent or the token failed validation.
#[derive(Debug, Clone)]
pub struct SessionToken(pub Option<String>);

impl<S> axum::extract::FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let token = parts
                .extensions
                .get::<ValidatedToken>()
                .map(|ValidatedToken(t)| t.clone());
            Ok(SessionToken(token))
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No session token was provided.
    Unauthenticated,
    /// A token was provided but did not validate.
    Rejected(AuthError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let err = match self {
            AuthRejection::Unauthenticated => {
                DomainError::new(ErrorCode::Unauthorized, "Authentication required")
            }
            AuthRejection::Rejected(e) => e.into(),
        };
        ApiError(err).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::domain::foundation::UserId;
    use axum::{
        body::Body,
        http::{HeaderValue, Request as HttpRequest, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    fn test_user() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("user-123").unwrap(), "test@example.com", true)
    }

    async fn whoami(RequireAuth(user): RequireAuth, SessionToken(token): SessionToken) -> String {
        format!("{}:{}", user.id, token.unwrap_or_default())
    }

    async fn public() -> &'static str {
        "ok"
    }

    fn app(validator: MockSessionValidator) -> Router {
        let state: AuthState = Arc::new(validator);
        Router::new()
            .route("/me", get(whoami))
            .route("/public", get(public))
            .layer(middleware::from_fn_with_state(state, auth_middleware))
    }

    fn request(uri: &str, credential: Option<(header::HeaderName, &str)>) -> HttpRequest<Body> {
        let mut builder = HttpRequest::builder().uri(uri);
        if let Some((name, value)) = credential {
            builder = builder.header(name, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Token extraction
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn cookie_takes_precedence_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("access_token=from-cookie"));
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer from-header"),
        );

        assert_eq!(extract_session_token(&headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn bearer_header_is_used_without_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer my-secret-token"),
        );
        assert_eq!(
            extract_session_token(&headers).as_deref(),
            Some("my-secret-token")
        );

        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_static("Basic dXNlcjpwYXNz"),
        );
        assert_eq!(extract_session_token(&headers), None);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Middleware + extractors
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn valid_cookie_authenticates() {
        let app = app(MockSessionValidator::new().with_user("good", test_user()));

        let response = app
            .oneshot(request("/me", Some((header::COOKIE, "access_token=good"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "user-123:good");
    }

    #[tokio::test]
    async fn valid_bearer_authenticates() {
        let app = app(MockSessionValidator::new().with_user("good", test_user()));

        let response = app
            .oneshot(request("/me", Some((header::AUTHORIZATION, "Bearer good"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let response = app(MockSessionValidator::new())
            .oneshot(request("/me", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(body_text(response).await.contains("\"code\":\"UNAUTHORIZED\""));
    }

    #[tokio::test]
    async fn invalid_token_is_unauthorized_on_protected_routes() {
        let response = app(MockSessionValidator::new())
            .oneshot(request("/me", Some((header::COOKIE, "access_token=stale"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_does_not_block_public_routes() {
        let response = app(MockSessionValidator::new())
            .oneshot(request("/public", Some((header::COOKIE, "access_token=stale"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn validator_outage_is_bad_gateway() {
        let validator = MockSessionValidator::new()
            .with_user("good", test_user())
            .with_error(AuthError::service_unavailable("jwks down"));

        let response = app(validator)
            .oneshot(request("/me", Some((header::AUTHORIZATION, "Bearer good"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn auth_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthState>();
        assert_send_sync::<RequireAuth>();
        assert_send_sync::<SessionToken>();
    }
}
