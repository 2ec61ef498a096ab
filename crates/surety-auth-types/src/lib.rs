//! Auth types shared across surety portal crates.
//!
//! Provides session-token validation, the `Identity` extractor, and the signed
//! time-limited token codec used for access and invitation links.

pub mod identity;
pub mod link_token;
pub mod session;
