//! HTTP handlers for account endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::dto::MessageResponse;
use crate::adapters::http::error::{parse_user_id, ApiError, JsonBody};
use crate::adapters::http::middleware::{
    cleared_session_cookie, session_cookie, RequireAuth, SessionToken,
};
use crate::application::handlers::account::{
    DeleteUserCommand, DeleteUserHandler, GetUserHandler, GetUserQuery, LoginUserCommand,
    LoginUserHandler, LogoutUserCommand, LogoutUserHandler, RegisterUserCommand,
    RegisterUserHandler, ResetPasswordCommand, ResetPasswordHandler, UpdateUserCommand,
    UpdateUserHandler,
};

use super::dto::{
    LoginRequest, LoginResponse, RegisterUserRequest, RegisterUserResponse, ResetPasswordRequest,
    SignedInUser, UpdateUserRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct UserHandlers {
    register_handler: Arc<RegisterUserHandler>,
    login_handler: Arc<LoginUserHandler>,
    logout_handler: Arc<LogoutUserHandler>,
    reset_password_handler: Arc<ResetPasswordHandler>,
    get_handler: Arc<GetUserHandler>,
    update_handler: Arc<UpdateUserHandler>,
    delete_handler: Arc<DeleteUserHandler>,
    secure_cookies: bool,
}

impl UserHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        register_handler: Arc<RegisterUserHandler>,
        login_handler: Arc<LoginUserHandler>,
        logout_handler: Arc<LogoutUserHandler>,
        reset_password_handler: Arc<ResetPasswordHandler>,
        get_handler: Arc<GetUserHandler>,
        update_handler: Arc<UpdateUserHandler>,
        delete_handler: Arc<DeleteUserHandler>,
        secure_cookies: bool,
    ) -> Self {
        Self {
            register_handler,
            login_handler,
            logout_handler,
            reset_password_handler,
            get_handler,
            update_handler,
            delete_handler,
            secure_cookies,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/v1/users/register - Create an account (and doctor record)
pub async fn register_user(
    State(handlers): State<UserHandlers>,
    JsonBody(req): JsonBody<RegisterUserRequest>,
) -> Result<Response, ApiError> {
    let registration = req.into_registration()?;
    let result = handlers
        .register_handler
        .handle(RegisterUserCommand { registration })
        .await?;

    let response = RegisterUserResponse {
        message: "Verification email sent! User created successfully.".to_string(),
        user: result.user,
        doctor: result.doctor,
    };
    Ok((StatusCode::CREATED, Json(response)).into_response())
}

/// POST /api/v1/users/login - Sign in and set the session cookie
pub async fn login_user(
    State(handlers): State<UserHandlers>,
    JsonBody(req): JsonBody<LoginRequest>,
) -> Result<Response, ApiError> {
    let result = handlers
        .login_handler
        .handle(LoginUserCommand {
            email: req.email,
            password: req.password,
        })
        .await?;

    let cookie = session_cookie(&result.id_token, handlers.secure_cookies);
    let response = LoginResponse {
        message: "User logged in successfully!".to_string(),
        user: SignedInUser {
            uid: result.user.uid,
            email: result.user.email,
        },
    };
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(response)).into_response())
}

/// POST /api/v1/users/logout - End the session and clear the cookie
pub async fn logout_user(
    State(handlers): State<UserHandlers>,
    SessionToken(id_token): SessionToken,
) -> Result<Response, ApiError> {
    handlers
        .logout_handler
        .handle(LogoutUserCommand { id_token })
        .await?;

    let cookie = cleared_session_cookie(handlers.secure_cookies);
    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(MessageResponse::new("User logged out successfully!")),
    )
        .into_response())
}

/// POST /api/v1/users/reset-password - Send a password reset email
pub async fn reset_password(
    State(handlers): State<UserHandlers>,
    JsonBody(req): JsonBody<ResetPasswordRequest>,
) -> Result<Response, ApiError> {
    handlers
        .reset_password_handler
        .handle(ResetPasswordCommand { email: req.email })
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse::new("Password reset email sent successfully!")),
    )
        .into_response())
}

/// GET /api/v1/users/:uid - Fetch a user record
pub async fn get_user(
    State(handlers): State<UserHandlers>,
    RequireAuth(_caller): RequireAuth,
    Path(uid): Path<String>,
) -> Result<Response, ApiError> {
    let uid = parse_user_id("uid", uid)?;
    let user = handlers.get_handler.handle(GetUserQuery { uid }).await?;
    Ok((StatusCode::OK, Json(user)).into_response())
}

/// PUT /api/v1/users/:uid - Update names, email or avatar
pub async fn update_user(
    State(handlers): State<UserHandlers>,
    RequireAuth(_caller): RequireAuth,
    Path(uid): Path<String>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Response, ApiError> {
    let uid = parse_user_id("uid", uid)?;
    let user = handlers
        .update_handler
        .handle(UpdateUserCommand {
            uid,
            patch: req.into(),
        })
        .await?;
    Ok((StatusCode::OK, Json(user)).into_response())
}

/// DELETE /api/v1/users/:uid - Remove a user and everything they own
///
/// The identity account is only removed when callers delete themselves,
/// since that needs their own session token.
pub async fn delete_user(
    State(handlers): State<UserHandlers>,
    RequireAuth(caller): RequireAuth,
    SessionToken(token): SessionToken,
    Path(uid): Path<String>,
) -> Result<Response, ApiError> {
    let uid = parse_user_id("uid", uid)?;
    let own_account = caller.id == uid;
    let identity_token = token.filter(|_| own_account);

    handlers
        .delete_handler
        .handle(DeleteUserCommand {
            uid,
            identity_token,
        })
        .await?;

    let body = Json(MessageResponse::new("User deleted successfully"));
    if own_account {
        let cookie = cleared_session_cookie(handlers.secure_cookies);
        Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], body).into_response())
    } else {
        Ok((StatusCode::OK, body).into_response())
    }
}
