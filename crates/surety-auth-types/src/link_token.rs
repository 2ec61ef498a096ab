//! Signed time-limited tokens for stateless links.
//!
//! A token is a compact HS256 JWS over `{payload, iat, exp}`: three base64url
//! segments, printable and URL-safe. Any edit to the token breaks the
//! signature, and a token is only accepted while `exp > now`.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default token lifetime in seconds (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LinkClaims {
    payload: Value,
    iat: i64,
    exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    purpose: Option<String>,
}

/// A payload bound to one link flow. The purpose is signed into the token,
/// so a token minted for one flow never decodes in another.
pub trait LinkPayload: Serialize + DeserializeOwned {
    const PURPOSE: &'static str;
}

/// Why a token failed to decode. Callers at the HTTP edge collapse every
/// variant into one generic failure.
#[derive(Debug, thiserror::Error)]
pub enum LinkTokenError {
    #[error("malformed token")]
    Malformed,
    #[error("invalid token signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("token issued for another purpose")]
    WrongPurpose,
    #[error("failed to encode token")]
    Encode(#[source] jsonwebtoken::errors::Error),
}

/// A decoded token: the caller's payload plus its validity window.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedToken {
    pub payload: Value,
    pub issued_at: i64,
    pub expires_at: i64,
    pub purpose: Option<String>,
}

#[derive(Clone)]
pub struct TimeLimitedTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TimeLimitedTokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        // Expiry is checked by `decode_at` with a strict comparison and no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Encode `payload` with a lifetime of `ttl_secs`. A non-positive TTL yields
    /// a token that is already expired.
    pub fn encode<T: Serialize>(&self, payload: &T, ttl_secs: i64) -> Result<String, LinkTokenError> {
        self.encode_at(payload, ttl_secs, now_secs())
    }

    pub fn encode_default<T: Serialize>(&self, payload: &T) -> Result<String, LinkTokenError> {
        self.encode(payload, DEFAULT_TOKEN_TTL_SECS)
    }

    pub fn encode_at<T: Serialize>(
        &self,
        payload: &T,
        ttl_secs: i64,
        now: i64,
    ) -> Result<String, LinkTokenError> {
        self.sign(payload, ttl_secs, now, None)
    }

    /// Encode a flow-bound payload, tagging the token with `T::PURPOSE`.
    pub fn encode_for<T: LinkPayload>(
        &self,
        payload: &T,
        ttl_secs: i64,
        now: i64,
    ) -> Result<String, LinkTokenError> {
        self.sign(payload, ttl_secs, now, Some(T::PURPOSE))
    }

    fn sign<T: Serialize>(
        &self,
        payload: &T,
        ttl_secs: i64,
        now: i64,
        purpose: Option<&str>,
    ) -> Result<String, LinkTokenError> {
        let payload = serde_json::to_value(payload)
            .map_err(|e| LinkTokenError::Encode(jsonwebtoken::errors::Error::from(e)))?;
        let claims = LinkClaims {
            payload,
            iat: now,
            exp: now.saturating_add(ttl_secs),
            purpose: purpose.map(str::to_owned),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(LinkTokenError::Encode)
    }

    /// Decode and validate a token, returning its payload unchanged.
    pub fn decode(&self, token: &str) -> Result<Value, LinkTokenError> {
        self.decode_at(token, now_secs()).map(|t| t.payload)
    }

    /// Decode and deserialize the payload into `T`. A payload of the wrong
    /// shape counts as malformed.
    pub fn decode_as<T: DeserializeOwned>(&self, token: &str) -> Result<T, LinkTokenError> {
        let payload = self.decode(token)?;
        serde_json::from_value(payload).map_err(|_| LinkTokenError::Malformed)
    }

    /// Decode a token minted by [`encode_for`](Self::encode_for) for the same
    /// payload type. Untagged or differently tagged tokens are rejected.
    pub fn decode_for<T: LinkPayload>(&self, token: &str) -> Result<T, LinkTokenError> {
        let decoded = self.decode_at(token, now_secs())?;
        if decoded.purpose.as_deref() != Some(T::PURPOSE) {
            return Err(LinkTokenError::WrongPurpose);
        }
        serde_json::from_value(decoded.payload).map_err(|_| LinkTokenError::Malformed)
    }

    pub fn decode_at(&self, token: &str, now: i64) -> Result<DecodedToken, LinkTokenError> {
        let data = decode::<LinkClaims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => LinkTokenError::InvalidSignature,
                _ => LinkTokenError::Malformed,
            }
        })?;
        let claims = data.claims;
        if claims.exp <= now {
            return Err(LinkTokenError::Expired);
        }
        Ok(DecodedToken {
            payload: claims.payload,
            issued_at: claims.iat,
            expires_at: claims.exp,
            purpose: claims.purpose,
        })
    }
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
