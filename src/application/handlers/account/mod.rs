//! Account command and query handlers.
//!
//! Sign-up, sign-in and sign-out go through the identity provider; the
//! remaining handlers operate on the user record.

mod delete_user;
mod get_user;
mod login_user;
mod logout_user;
mod register_user;
mod reset_password;
mod update_user;

pub use delete_user::{DeleteUserCommand, DeleteUserHandler};
pub use get_user::{GetUserHandler, GetUserQuery};
pub use login_user::{LoginUserCommand, LoginUserHandler, LoginUserResult};
pub use logout_user::{LogoutUserCommand, LogoutUserHandler};
pub use register_user::{RegisterUserCommand, RegisterUserHandler, RegisterUserResult};
pub use reset_password::{ResetPasswordCommand, ResetPasswordHandler};
pub use update_user::{UpdateUserCommand, UpdateUserHandler};
