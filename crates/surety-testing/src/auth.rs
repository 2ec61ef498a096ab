//! Mock identity-provider sessions for integration tests.
//!
//! The portal trusts a session JWT minted by an external identity provider.
//! `MockSession` mints the same token with a test secret so requests can be
//! authenticated without a real provider.

use axum::http::{HeaderName, HeaderValue, header};
use uuid::Uuid;

use surety_auth_types::session::{SESSION_COOKIE, issue_session};
use surety_domain::id::BrokerId;
use surety_domain::role::PortalRole;

/// Secret shared between `MockSession` and the app under test.
pub const TEST_SESSION_SECRET: &str = "test-session-secret-for-integration-tests";

/// Configurable identity for test requests.
pub struct MockSession {
    pub user_id: Uuid,
    pub role: PortalRole,
    pub secret: String,
}

impl MockSession {
    pub fn new(user_id: Uuid, role: PortalRole) -> Self {
        Self {
            user_id,
            role,
            secret: TEST_SESSION_SECRET.to_owned(),
        }
    }

    pub fn broker(id: BrokerId) -> Self {
        Self::new(id.0, PortalRole::Broker)
    }

    pub fn underwriter() -> Self {
        Self::new(Uuid::new_v4(), PortalRole::Underwriter)
    }

    pub fn admin() -> Self {
        Self::new(Uuid::new_v4(), PortalRole::Admin)
    }

    /// Signed session token valid for one hour.
    pub fn token(&self) -> String {
        let exp = chrono::Utc::now().timestamp() as u64 + 3600;
        issue_session(self.user_id, self.role, exp, &self.secret)
            .expect("failed to sign test session")
    }

    /// `Cookie` header carrying the session, as a browser would send it.
    pub fn cookie_header(&self) -> (HeaderName, HeaderValue) {
        let value = format!("{SESSION_COOKIE}={}", self.token());
        (
            header::COOKIE,
            HeaderValue::from_str(&value).expect("session cookie is valid header text"),
        )
    }
}
