#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};

use surety_domain::email::Email;
use surety_domain::id::{BrokerId, OfferId, PolicyholderId, ProposalId};
use surety_domain::offer::OfferDecision;
use surety_domain::pin::Pin;

use crate::domain::types::{AccessCodeRecord, BondOffer, Broker, Policyholder, Proposal};
use crate::error::PortalError;

/// Why a PIN could not be consumed. Never shown to callers; every variant is
/// reported as the same invalid-credential failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConsumeError {
    #[error("no outstanding code")]
    NotFound,
    #[error("code expired")]
    Expired,
    #[error("pin mismatch")]
    Mismatch,
}

/// Custody of outstanding one-time access codes, keyed by email.
///
/// All operations are synchronous and must be atomic with respect to each
/// other; only the store may touch its underlying mapping.
pub trait AccessCodeRepository: Send + Sync {
    /// Insert, or replace the record for the same email.
    fn upsert(&self, record: AccessCodeRecord);

    fn get(&self, email: &Email) -> Option<AccessCodeRecord>;

    /// Delete the record if present; absent is not an error.
    fn remove(&self, email: &Email);

    /// Check `pin` against the stored record and delete it on match, as one
    /// atomic step. Expired records are dropped. A mismatch leaves the record
    /// untouched.
    fn consume(
        &self,
        email: &Email,
        pin: &Pin,
        now: DateTime<Utc>,
    ) -> Result<AccessCodeRecord, ConsumeError>;
}

/// Out-of-band delivery of an issued PIN (email, SMS, ...).
pub trait PinNotifier: Send + Sync {
    async fn deliver(&self, record: &AccessCodeRecord, link: &str) -> Result<(), PortalError>;
}

pub trait BrokerRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Broker>, PortalError>;

    async fn find_by_email(&self, email: &Email) -> Result<Option<Broker>, PortalError>;

    /// Insert a broker unless one with the same email exists.
    /// Returns `true` if inserted, `false` on duplicate email.
    async fn insert_if_absent(&self, broker: &Broker) -> Result<bool, PortalError>;
}

pub trait ProposalRepository: Send + Sync {
    /// Proposals ordered by id; restricted to `owner` when given.
    async fn list(&self, owner: Option<BrokerId>) -> Result<Vec<Proposal>, PortalError>;

    async fn find_by_id(&self, id: ProposalId) -> Result<Option<Proposal>, PortalError>;
}

pub trait PolicyholderRepository: Send + Sync {
    /// Policyholders ordered by id; restricted to `owner` when given.
    async fn list(&self, owner: Option<BrokerId>) -> Result<Vec<Policyholder>, PortalError>;

    async fn find_by_id(&self, id: PolicyholderId) -> Result<Option<Policyholder>, PortalError>;
}

pub trait OfferRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<BondOffer>, PortalError>;

    async fn find_by_id(&self, id: OfferId) -> Result<Option<BondOffer>, PortalError>;

    /// Move a pending offer to its decided state atomically.
    ///
    /// Fails with `OfferNotFound` or `OfferAlreadyDecided`.
    async fn apply_decision(
        &self,
        id: OfferId,
        decision: OfferDecision,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<BondOffer, PortalError>;
}
