//! Test utilities for surety portal crates.
//!
//! Provides `MockSession` for authenticated requests and a JSON fixture loader.
//! Import from `[dev-dependencies]` only, never in production code.

pub mod auth;
pub mod fixture;
