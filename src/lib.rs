//! File-backed persistence core for the streavmin media catalog: a
//! concurrency-safe JSON document store plus the catalog and credential
//! repositories built on top of it. Collaborators (the HTTP layer, the UI,
//! maintenance scripts) consume this crate as a library; it exposes no
//! network protocol of its own.

pub mod common;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod modules;
pub mod state;

pub use error::{Result, StoreError};
