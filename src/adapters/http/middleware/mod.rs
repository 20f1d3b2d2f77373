//! HTTP middleware for axum.
//!
//! - `auth` - Session token validation and the extractors built on it
//! - `cookie` - Reading and writing the `access_token` cookie

pub mod auth;
pub mod cookie;

pub use auth::{
    auth_middleware, extract_session_token, AuthRejection, AuthState, RequireAuth, SessionToken,
};
pub use cookie::{cleared_session_cookie, session_cookie, session_cookie_value, SESSION_COOKIE};
