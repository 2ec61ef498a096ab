//! Session-token validation.
//!
//! The external identity provider signs an HS256 JWT and stores it in the
//! [`SESSION_COOKIE`] cookie. The portal only ever validates it.

use jsonwebtoken::{DecodingKey, Validation, decode};
use serde::Deserialize;
#[cfg(any(feature = "ISSUE_SESSIONS", test))]
use serde::Serialize;
use uuid::Uuid;

use surety_domain::role::PortalRole;

/// Cookie name carrying the identity provider's session token.
pub const SESSION_COOKIE: &str = "surety_session";

/// Identity extracted from a validated session token.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    pub user_id: Uuid,
    pub role: PortalRole,
    pub expires_at: u64,
}

/// Errors returned by [`validate_session`].
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("session expired")]
    Expired,
    #[error("malformed session token")]
    Malformed,
}

/// JWT claims payload of a session token.
///
/// | Field | JWT claim | Rust type | Meaning |
/// |-------|-----------|-----------|---------|
/// | `sub` | `sub` | UUID string | user ID (broker ID for brokers) |
/// | `role` | custom | `u8` wire value | see [`PortalRole`] |
/// | `exp` | `exp` | seconds since epoch | session expiration |
///
/// [`Serialize`] requires the **`ISSUE_SESSIONS`** cargo feature; the portal
/// itself never mints sessions.
#[derive(Debug, Deserialize)]
#[cfg_attr(any(feature = "ISSUE_SESSIONS", test), derive(Serialize))]
pub struct SessionClaims {
    pub sub: String,
    pub role: u8,
    pub exp: u64,
}

/// Validate a session cookie value, returning the parsed identity.
///
/// Validation: HS256, `exp` checked with the default 60s leeway, required
/// claims `exp` + `sub`. Unknown role values are treated as malformed.
pub fn validate_session(cookie_value: &str, secret: &str) -> Result<SessionInfo, SessionError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<SessionClaims>(
        cookie_value,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => SessionError::InvalidSignature,
        _ => SessionError::Malformed,
    })?;

    let claims = data.claims;
    let user_id = claims
        .sub
        .parse::<Uuid>()
        .map_err(|_| SessionError::Malformed)?;
    let role = PortalRole::from_u8(claims.role).ok_or(SessionError::Malformed)?;
    Ok(SessionInfo {
        user_id,
        role,
        expires_at: claims.exp,
    })
}

/// Mint a session token the way the identity provider does.
#[cfg(any(feature = "ISSUE_SESSIONS", test))]
pub fn issue_session(
    user_id: Uuid,
    role: PortalRole,
    exp: u64,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    use jsonwebtoken::{EncodingKey, Header, encode};

    let claims = SessionClaims {
        sub: user_id.to_string(),
        role: role.as_u8(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
