//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Firebase identity provider and token validation, plus mocks
//! - `http` - axum REST API
//! - `memory` - In-memory repositories for tests and database-free runs
//! - `postgres` - PostgreSQL repositories

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;
