//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, auth)
//! - `scheduling` - Users, doctors, availability slots and appointments

pub mod foundation;
pub mod scheduling;
