//! doctor-visit - Clinic scheduling backend
//!
//! Doctors publish weekly availability slots; patients book them. Accounts
//! live in Firebase Authentication, records in PostgreSQL.
//!
//! # Layout
//!
//! - `domain` - Scheduling vocabulary and rules, no I/O
//! - `ports` - Traits the application needs from the outside world
//! - `application` - One handler per operation
//! - `adapters` - Postgres, Firebase, in-memory and HTTP implementations
//! - `config`, `telemetry`, `server` - Process wiring

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod server;
pub mod telemetry;
