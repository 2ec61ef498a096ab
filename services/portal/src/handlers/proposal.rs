use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::Serialize;

use surety_auth_types::identity::Identity;
use surety_domain::id::ProposalId;
use surety_domain::pagination::{Page, PageRequest};

use crate::domain::types::{Proposal, ProposalStatus};
use crate::error::PortalError;
use crate::state::AppState;
use crate::usecase::proposal::{GetProposalUseCase, ListProposalsUseCase};

#[derive(Serialize)]
pub struct ProposalResponse {
    pub id: u32,
    pub broker_id: String,
    pub policyholder_id: u32,
    pub bond_type: String,
    pub amount_cents: u64,
    pub currency: String,
    pub status: ProposalStatus,
    #[serde(serialize_with = "surety_core::serde::to_rfc3339_ms")]
    pub submitted_at: chrono::DateTime<chrono::Utc>,
}

impl From<Proposal> for ProposalResponse {
    fn from(p: Proposal) -> Self {
        Self {
            id: p.id.0,
            broker_id: p.broker_id.to_string(),
            policyholder_id: p.policyholder_id.0,
            bond_type: p.bond_type,
            amount_cents: p.amount_cents,
            currency: p.currency,
            status: p.status,
            submitted_at: p.submitted_at,
        }
    }
}

// ── GET /proposals ───────────────────────────────────────────────────────────

pub async fn list_proposals(
    identity: Identity,
    State(state): State<AppState>,
    query: Result<Query<PageRequest>, QueryRejection>,
) -> Result<Json<Page<ProposalResponse>>, PortalError> {
    let Query(page) = query?;
    let usecase = ListProposalsUseCase {
        proposals: state.proposal_repo(),
    };
    let page = usecase.execute(&identity, page).await?;
    Ok(Json(page.map(Into::into)))
}

// ── GET /proposals/{id} ──────────────────────────────────────────────────────

pub async fn get_proposal(
    identity: Identity,
    State(state): State<AppState>,
    id: Result<Path<u32>, PathRejection>,
) -> Result<Json<ProposalResponse>, PortalError> {
    let Path(id) = id?;
    let usecase = GetProposalUseCase {
        proposals: state.proposal_repo(),
    };
    let proposal = usecase.execute(&identity, ProposalId(id)).await?;
    Ok(Json(proposal.into()))
}
