use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};

use surety_auth_types::identity::Identity;
use surety_auth_types::link_token::TimeLimitedTokenCodec;
use surety_domain::email::Email;
use surety_domain::id::OfferId;
use surety_domain::offer::OfferDecision;
use surety_domain::role::PortalRole;

use crate::domain::repository::OfferRepository;
use crate::domain::types::{BondOffer, InvitationClaims, MAX_REJECTION_REASON_LEN};
use crate::error::PortalError;

fn decode_invitation(
    codec: &TimeLimitedTokenCodec,
    token: &str,
) -> Result<InvitationClaims, PortalError> {
    codec.decode_for::<InvitationClaims>(token).map_err(|e| {
        tracing::debug!(error = %e, "invitation token rejected");
        PortalError::TokenInvalid
    })
}

// ── ListOffers ───────────────────────────────────────────────────────────────

pub struct ListOffersUseCase<O: OfferRepository> {
    pub offers: O,
}

impl<O: OfferRepository> ListOffersUseCase<O> {
    pub async fn execute(&self, caller: &Identity) -> Result<Vec<BondOffer>, PortalError> {
        caller.require(PortalRole::Underwriter)?;
        self.offers.list().await
    }
}

// ── IssueInvitation ──────────────────────────────────────────────────────────

pub struct IssueInvitationInput {
    pub offer_id: OfferId,
    pub email: Email,
}

#[derive(Debug)]
pub struct IssueInvitationOutput {
    pub token: String,
    pub link: String,
    pub expires_at: DateTime<Utc>,
}

pub struct IssueInvitationUseCase<O: OfferRepository> {
    pub offers: O,
    pub codec: Arc<TimeLimitedTokenCodec>,
    pub public_base_url: String,
    pub ttl_secs: i64,
}

impl<O: OfferRepository> IssueInvitationUseCase<O> {
    pub async fn execute(
        &self,
        caller: &Identity,
        input: IssueInvitationInput,
    ) -> Result<IssueInvitationOutput, PortalError> {
        caller.require(PortalRole::Underwriter)?;

        let offer = self
            .offers
            .find_by_id(input.offer_id)
            .await?
            .ok_or(PortalError::OfferNotFound)?;
        if !offer.status.is_pending() {
            return Err(PortalError::OfferAlreadyDecided);
        }

        let now = Utc::now().timestamp();
        let claims = InvitationClaims {
            offer_id: offer.id,
            email: input.email,
        };
        let token = self
            .codec
            .encode_for(&claims, self.ttl_secs, now)
            .map_err(|e| PortalError::Internal(e.into()))?;
        let expires_at = Utc
            .timestamp_opt(now.saturating_add(self.ttl_secs), 0)
            .single()
            .ok_or_else(|| PortalError::Internal(anyhow::anyhow!("invitation expiry out of range")))?;
        let link = format!(
            "{}/invitations/{}",
            self.public_base_url.trim_end_matches('/'),
            token
        );

        tracing::info!(offer_id = %offer.id, email = %claims.email, "invitation issued");
        Ok(IssueInvitationOutput {
            token,
            link,
            expires_at,
        })
    }
}

// ── ViewInvitation ───────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct InvitationView {
    pub email: Email,
    pub offer: BondOffer,
}

pub struct ViewInvitationUseCase<O: OfferRepository> {
    pub offers: O,
    pub codec: Arc<TimeLimitedTokenCodec>,
}

impl<O: OfferRepository> ViewInvitationUseCase<O> {
    pub async fn execute(&self, token: &str) -> Result<InvitationView, PortalError> {
        let claims = decode_invitation(&self.codec, token)?;
        let offer = self
            .offers
            .find_by_id(claims.offer_id)
            .await?
            .ok_or(PortalError::OfferNotFound)?;
        Ok(InvitationView {
            email: claims.email,
            offer,
        })
    }
}

// ── DecideInvitation ─────────────────────────────────────────────────────────

pub struct DecideInvitationInput {
    pub decision: OfferDecision,
    pub reason: Option<String>,
}

pub struct DecideInvitationUseCase<O: OfferRepository> {
    pub offers: O,
    pub codec: Arc<TimeLimitedTokenCodec>,
}

impl<O: OfferRepository> DecideInvitationUseCase<O> {
    pub async fn execute(
        &self,
        token: &str,
        input: DecideInvitationInput,
    ) -> Result<BondOffer, PortalError> {
        let claims = decode_invitation(&self.codec, token)?;

        let reason = match input.decision {
            OfferDecision::Accept => None,
            OfferDecision::Reject => input
                .reason
                .map(|r| r.trim().to_owned())
                .filter(|r| !r.is_empty()),
        };
        if reason
            .as_ref()
            .is_some_and(|r| r.chars().count() > MAX_REJECTION_REASON_LEN)
        {
            return Err(PortalError::validation(
                "reason",
                format!("reason must be at most {MAX_REJECTION_REASON_LEN} characters"),
            ));
        }

        let offer = self
            .offers
            .apply_decision(claims.offer_id, input.decision, reason, Utc::now())
            .await?;
        tracing::info!(
            offer_id = %offer.id,
            email = %claims.email,
            status = ?offer.status,
            "offer decided"
        );
        Ok(offer)
    }
}
