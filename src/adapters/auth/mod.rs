//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` and `IdentityProvider` ports:
//!
//! - `firebase_identity` - Identity Toolkit REST client (accounts, emails)
//! - `firebase_validator` - Firebase ID token verification against Google's JWKS
//! - `mock` - Test implementations that don't require external services

mod firebase_identity;
mod firebase_validator;
mod mock;

pub use firebase_identity::FirebaseIdentityProvider;
pub use firebase_validator::{FirebaseSessionValidator, FirebaseTokenConfig};
pub use mock::{MockIdentityProvider, MockSessionValidator};
