use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use surety_auth_types::link_token::LinkPayload;
use surety_domain::email::Email;
use surety_domain::id::{BrokerId, OfferId, PolicyholderId, ProposalId};
use surety_domain::offer::OfferStatus;
use surety_domain::pin::Pin;

/// Outstanding one-time PIN for an email address. At most one per email.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessCodeRecord {
    pub email: Email,
    pub pin: Pin,
    /// Opaque metadata captured with the request; never interpreted.
    pub country: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl AccessCodeRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Registered broker account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Broker {
    pub id: BrokerId,
    pub name: String,
    pub email: Email,
    pub company: String,
    pub license_number: String,
    pub registered_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProposalStatus {
    Draft,
    Submitted,
    UnderReview,
    Approved,
    Declined,
}

/// Bond proposal submitted by a broker on behalf of a policyholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub broker_id: BrokerId,
    pub policyholder_id: PolicyholderId,
    pub bond_type: String,
    /// Bond amount in minor currency units.
    pub amount_cents: u64,
    pub currency: String,
    pub status: ProposalStatus,
    pub submitted_at: DateTime<Utc>,
}

/// Principal on whose behalf a bond is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Policyholder {
    pub id: PolicyholderId,
    pub broker_id: BrokerId,
    pub name: String,
    pub registration_number: String,
    pub country: String,
    pub contact_email: Email,
}

/// Bond offer made against a proposal and answered through an invitation link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondOffer {
    pub id: OfferId,
    pub proposal_id: ProposalId,
    pub premium_cents: u64,
    pub coverage_cents: u64,
    pub currency: String,
    pub status: OfferStatus,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Payload embedded in an invitation link token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvitationClaims {
    pub offer_id: OfferId,
    pub email: Email,
}

impl LinkPayload for InvitationClaims {
    const PURPOSE: &'static str = "offer_invitation";
}

/// Payload embedded in the link sent alongside an access PIN.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccessLinkClaims {
    pub email: Email,
}

impl LinkPayload for AccessLinkClaims {
    const PURPOSE: &'static str = "access_link";
}

/// Longest accepted rejection reason, in characters.
pub const MAX_REJECTION_REASON_LEN: usize = 1000;
