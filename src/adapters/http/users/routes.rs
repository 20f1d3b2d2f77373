//! HTTP routes for account endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    delete_user, get_user, login_user, logout_user, register_user, reset_password, update_user,
    UserHandlers,
};

/// Creates the account router, mounted at `/api/v1/users`.
pub fn user_routes(handlers: UserHandlers) -> Router {
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/logout", post(logout_user))
        .route("/reset-password", post(reset_password))
        .route("/:uid", get(get_user).put(update_user).delete(delete_user))
        .with_state(handlers)
}
