//! Jetski Pool XMR tracker.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod persist;
pub mod scheduler;
pub mod score;
pub mod snapshot;
pub mod sources;
pub mod types;
