//! HTTP adapter for account endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    LoginRequest, LoginResponse, RegisterUserRequest, RegisterUserResponse, ResetPasswordRequest,
    SignedInUser, UpdateUserRequest,
};
pub use handlers::UserHandlers;
pub use routes::user_routes;
