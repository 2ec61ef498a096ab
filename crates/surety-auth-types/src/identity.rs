//! Session-cookie identity extractor.

use std::sync::Arc;

use axum::Json;
use axum::extract::{FromRef, FromRequestParts};
use axum::response::{IntoResponse, Response};
use axum_extra::extract::CookieJar;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use surety_domain::id::BrokerId;
use surety_domain::role::PortalRole;

use crate::session::{SESSION_COOKIE, validate_session};

/// HMAC secret shared with the identity provider. Handlers' state must expose
/// it through `FromRef` for [`Identity`] to be extractable.
#[derive(Clone)]
pub struct SessionKey(pub Arc<str>);

impl SessionKey {
    pub fn new(secret: impl Into<Arc<str>>) -> Self {
        Self(secret.into())
    }
}

/// Authenticated caller, taken from the `surety_session` cookie.
///
/// Rejects with 401 when the cookie is absent or fails validation. Role
/// enforcement (403) is done by handlers through [`Identity::require`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: PortalRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("requires {required:?} role")]
pub struct InsufficientRole {
    pub required: PortalRole,
}

impl Identity {
    pub fn require(&self, required: PortalRole) -> Result<(), InsufficientRole> {
        if self.role >= required {
            Ok(())
        } else {
            Err(InsufficientRole { required })
        }
    }

    /// Broker accounts share their id with the identity provider subject.
    pub fn broker_id(&self) -> BrokerId {
        BrokerId(self.user_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentityRejection {
    #[error("missing session")]
    MissingSession,
    #[error("invalid session")]
    InvalidSession,
}

impl IntoResponse for IdentityRejection {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "kind": "UNAUTHORIZED",
            "error": self.to_string(),
        });
        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    SessionKey: FromRef<S>,
{
    type Rejection = IdentityRejection;

    // Validation is synchronous; the future only carries the result.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let key = SessionKey::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);
        let result = match jar.get(SESSION_COOKIE) {
            None => Err(IdentityRejection::MissingSession),
            Some(cookie) => validate_session(cookie.value(), &key.0)
                .map(|info| Self {
                    user_id: info.user_id,
                    role: info.role,
                })
                .map_err(|e| {
                    tracing::debug!(error = %e, "session rejected");
                    IdentityRejection::InvalidSession
                }),
        };
        async move { result }
    }
}
