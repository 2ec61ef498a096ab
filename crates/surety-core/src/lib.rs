//! Service plumbing shared by surety portal binaries: config loading, error
//! bodies, health probes, tower layers and tracing setup.

pub mod config;
pub mod error;
pub mod health;
pub mod middleware;
pub mod serde;
pub mod tracing;
