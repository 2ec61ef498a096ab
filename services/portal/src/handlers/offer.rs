use axum::{
    Json,
    body::Bytes,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use surety_auth_types::identity::Identity;
use surety_domain::id::OfferId;
use surety_domain::offer::{OfferDecision, OfferStatus};

use crate::domain::types::BondOffer;
use crate::error::PortalError;
use crate::handlers::Violations;
use crate::state::AppState;
use crate::usecase::offer::{
    DecideInvitationInput, DecideInvitationUseCase, IssueInvitationInput, IssueInvitationUseCase,
    ListOffersUseCase, ViewInvitationUseCase,
};

#[derive(Serialize)]
pub struct OfferResponse {
    pub id: u32,
    pub proposal_id: u32,
    pub premium_cents: u64,
    pub coverage_cents: u64,
    pub currency: String,
    pub status: OfferStatus,
    #[serde(serialize_with = "surety_core::serde::to_rfc3339_ms_opt")]
    pub decided_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

impl From<BondOffer> for OfferResponse {
    fn from(o: BondOffer) -> Self {
        Self {
            id: o.id.0,
            proposal_id: o.proposal_id.0,
            premium_cents: o.premium_cents,
            coverage_cents: o.coverage_cents,
            currency: o.currency,
            status: o.status,
            decided_at: o.decided_at,
            rejection_reason: o.rejection_reason,
        }
    }
}

// ── GET /offers ──────────────────────────────────────────────────────────────

pub async fn list_offers(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<OfferResponse>>, PortalError> {
    let usecase = ListOffersUseCase {
        offers: state.offer_repo(),
    };
    let offers = usecase.execute(&identity).await?;
    Ok(Json(offers.into_iter().map(Into::into).collect()))
}

// ── POST /offers/{id}/invitations ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IssueInvitationRequest {
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct IssueInvitationResponse {
    pub token: String,
    pub link: String,
    #[serde(serialize_with = "surety_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

pub async fn issue_invitation(
    identity: Identity,
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
    payload: Result<Json<IssueInvitationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<IssueInvitationResponse>), PortalError> {
    let Path(id) = id?;
    let Json(body) = payload?;
    let mut violations = Violations::default();
    let email = violations.email("email", body.email);
    violations.into_result()?;
    let Some(email) = email else {
        return Err(PortalError::validation("email", "email is required"));
    };

    let usecase = IssueInvitationUseCase {
        offers: state.offer_repo(),
        codec: state.codec.clone(),
        public_base_url: state.settings.public_base_url.clone(),
        ttl_secs: state.settings.invitation_ttl_secs,
    };
    let out = usecase
        .execute(
            &identity,
            IssueInvitationInput {
                offer_id: OfferId(id),
                email,
            },
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(IssueInvitationResponse {
            token: out.token,
            link: out.link,
            expires_at: out.expires_at,
        }),
    ))
}

// ── GET /invitations/{token} ─────────────────────────────────────────────────

#[derive(Serialize)]
pub struct InvitationResponse {
    pub email: String,
    pub offer: OfferResponse,
}

pub async fn view_invitation(
    State(state): State<AppState>,
    token: Result<Path<String>, PathRejection>,
) -> Result<Json<InvitationResponse>, PortalError> {
    let Path(token) = token?;
    let usecase = ViewInvitationUseCase {
        offers: state.offer_repo(),
        codec: state.codec.clone(),
    };
    let view = usecase.execute(&token).await?;
    Ok(Json(InvitationResponse {
        email: view.email.to_string(),
        offer: view.offer.into(),
    }))
}

// ── POST /invitations/{token}/accept ─────────────────────────────────────────

pub async fn accept_invitation(
    State(state): State<AppState>,
    token: Result<Path<String>, PathRejection>,
) -> Result<Json<OfferResponse>, PortalError> {
    let Path(token) = token?;
    decide(&state, &token, OfferDecision::Accept, None).await
}

// ── POST /invitations/{token}/reject ─────────────────────────────────────────

#[derive(Deserialize, Default)]
pub struct RejectInvitationRequest {
    pub reason: Option<String>,
}

/// The body is optional; an empty body rejects without a reason.
pub async fn reject_invitation(
    State(state): State<AppState>,
    token: Result<Path<String>, PathRejection>,
    body: Bytes,
) -> Result<Json<OfferResponse>, PortalError> {
    let Path(token) = token?;
    let body: RejectInvitationRequest = if body.iter().all(u8::is_ascii_whitespace) {
        RejectInvitationRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| PortalError::validation("body", e.to_string()))?
    };
    decide(&state, &token, OfferDecision::Reject, body.reason).await
}

async fn decide(
    state: &AppState,
    token: &str,
    decision: OfferDecision,
    reason: Option<String>,
) -> Result<Json<OfferResponse>, PortalError> {
    let usecase = DecideInvitationUseCase {
        offers: state.offer_repo(),
        codec: state.codec.clone(),
    };
    let offer = usecase
        .execute(token, DecideInvitationInput { decision, reason })
        .await?;
    Ok(Json(offer.into()))
}
