//! In-memory repository adapters.
//!
//! `InMemoryStore` implements every repository port over one shared state
//! guarded by a single `tokio::sync::Mutex`. Each operation runs entirely
//! under that lock, which gives the same all-or-nothing booking semantics
//! as the PostgreSQL transaction. Used by tests and local runs without a
//! database.

mod store;

pub use store::InMemoryStore;
