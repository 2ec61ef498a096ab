//! Domain types shared across the surety portal crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod email;
pub mod id;
pub mod offer;
pub mod pagination;
pub mod pin;
pub mod role;
