use std::sync::Arc;

use anyhow::anyhow;
use chrono::{Duration, Utc};
use rand::RngExt;

use surety_auth_types::link_token::TimeLimitedTokenCodec;
use surety_domain::email::Email;
use surety_domain::pin::{PIN_MAX, PIN_MIN, Pin};

use crate::domain::repository::{AccessCodeRepository, PinNotifier};
use crate::domain::types::{AccessCodeRecord, AccessLinkClaims};
use crate::error::PortalError;

fn generate_pin() -> Result<Pin, PortalError> {
    let mut rng = rand::rng();
    Pin::from_number(rng.random_range(PIN_MIN..=PIN_MAX))
        .map_err(|e| PortalError::Internal(e.into()))
}

// ── RequestAccess ────────────────────────────────────────────────────────────

pub struct RequestAccessInput {
    pub email: Email,
    pub country: Option<String>,
}

#[derive(Debug)]
pub struct RequestAccessOutput {
    pub email: Email,
    pub pin: Pin,
    pub link: String,
}

pub struct RequestAccessUseCase<A, N>
where
    A: AccessCodeRepository,
    N: PinNotifier,
{
    pub access_codes: A,
    pub notifier: N,
    pub codec: Arc<TimeLimitedTokenCodec>,
    pub public_base_url: String,
    pub ttl_secs: i64,
}

impl<A, N> RequestAccessUseCase<A, N>
where
    A: AccessCodeRepository,
    N: PinNotifier,
{
    /// Issue a PIN and deliver it. The new PIN replaces any outstanding one
    /// only after delivery succeeds; a failed delivery leaves the earlier PIN
    /// valid.
    pub async fn execute(
        &self,
        input: RequestAccessInput,
    ) -> Result<RequestAccessOutput, PortalError> {
        let now = Utc::now();
        let expires_at = Duration::try_seconds(self.ttl_secs)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                PortalError::Internal(anyhow!("access code ttl {} out of range", self.ttl_secs))
            })?;

        // 1. Fresh PIN.
        let pin = generate_pin()?;
        let record = AccessCodeRecord {
            email: input.email.clone(),
            pin: pin.clone(),
            country: input.country,
            expires_at,
        };

        // 2. Link carrying the email so the verify page can prefill it.
        let token = self
            .codec
            .encode_for(
                &AccessLinkClaims {
                    email: input.email.clone(),
                },
                self.ttl_secs,
                now.timestamp(),
            )
            .map_err(|e| PortalError::Internal(e.into()))?;
        let link = format!(
            "{}/access/verify?token={}",
            self.public_base_url.trim_end_matches('/'),
            token
        );

        // 3. Out-of-band delivery, then replace any earlier PIN for this email.
        self.notifier.deliver(&record, &link).await?;
        self.access_codes.upsert(record);

        Ok(RequestAccessOutput {
            email: input.email,
            pin,
            link,
        })
    }
}

// ── VerifyPin ────────────────────────────────────────────────────────────────

pub struct VerifyPinInput {
    pub email: Email,
    pub pin: Pin,
}

pub struct VerifyPinUseCase<A: AccessCodeRepository> {
    pub access_codes: A,
}

impl<A: AccessCodeRepository> VerifyPinUseCase<A> {
    /// Succeeds at most once per issued PIN.
    pub fn execute(&self, input: VerifyPinInput) -> Result<(), PortalError> {
        match self
            .access_codes
            .consume(&input.email, &input.pin, Utc::now())
        {
            Ok(_) => {
                tracing::info!(email = %input.email, "access pin verified");
                Ok(())
            }
            Err(reason) => {
                tracing::info!(email = %input.email, %reason, "access pin rejected");
                Err(PortalError::InvalidCredential)
            }
        }
    }
}

// ── DecodeAccessLink ─────────────────────────────────────────────────────────

/// Resolve the email embedded in an access link.
pub fn decode_access_link(
    codec: &TimeLimitedTokenCodec,
    token: &str,
) -> Result<Email, PortalError> {
    codec
        .decode_for::<AccessLinkClaims>(token)
        .map(|claims| claims.email)
        .map_err(|e| {
            tracing::debug!(error = %e, "access link rejected");
            PortalError::TokenInvalid
        })
}
