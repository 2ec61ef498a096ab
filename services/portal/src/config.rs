use std::fmt;

use serde::Deserialize;

use surety_core::config::Config;

/// Portal service configuration loaded from environment variables.
#[derive(Deserialize)]
pub struct PortalConfig {
    /// Serve the bundled JSON fixtures and echo issued PINs back to the caller.
    /// Env var: `USE_MOCK_DATA` (default true).
    #[serde(default = "default_use_mock_data")]
    pub use_mock_data: bool,
    /// TCP port to listen on (default 3120). Env var: `PORTAL_PORT`.
    #[serde(default = "default_portal_port")]
    pub portal_port: u16,
    /// HMAC secret for access and invitation link tokens. Env var: `TOKEN_SECRET`.
    pub token_secret: String,
    /// HMAC secret shared with the identity provider for session cookies.
    /// Env var: `SESSION_SECRET`.
    pub session_secret: String,
    /// Base URL of the portal frontend, used to build emailed links.
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// Lifetime of an issued access PIN in seconds (default 600).
    #[serde(default = "default_access_code_ttl_secs")]
    pub access_code_ttl_secs: i64,
    /// Lifetime of an invitation link in seconds (default 86400).
    #[serde(default = "default_invitation_ttl_secs")]
    pub invitation_ttl_secs: i64,
}

impl Config for PortalConfig {}

/// Longest accepted lifetime for access codes and invitation links (one year).
pub const MAX_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be between 1 and {MAX_TTL_SECS} seconds, got {value}")]
    TtlOutOfRange { name: &'static str, value: i64 },
}

impl PortalConfig {
    /// Reject values that would make every issued PIN or link unusable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("ACCESS_CODE_TTL_SECS", self.access_code_ttl_secs),
            ("INVITATION_TTL_SECS", self.invitation_ttl_secs),
        ] {
            if !(1..=MAX_TTL_SECS).contains(&value) {
                return Err(ConfigError::TtlOutOfRange { name, value });
            }
        }
        Ok(())
    }
}

fn default_use_mock_data() -> bool {
    true
}

fn default_portal_port() -> u16 {
    3120
}

fn default_public_base_url() -> String {
    "http://localhost:3000".to_owned()
}

fn default_access_code_ttl_secs() -> i64 {
    600
}

fn default_invitation_ttl_secs() -> i64 {
    86_400
}

impl fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalConfig")
            .field("use_mock_data", &self.use_mock_data)
            .field("portal_port", &self.portal_port)
            .field("token_secret", &"<redacted>")
            .field("session_secret", &"<redacted>")
            .field("public_base_url", &self.public_base_url)
            .field("access_code_ttl_secs", &self.access_code_ttl_secs)
            .field("invitation_ttl_secs", &self.invitation_ttl_secs)
            .finish()
    }
}
