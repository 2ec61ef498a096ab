use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use anyhow::anyhow;
use chrono::{DateTime, Utc};

use surety_domain::email::Email;
use surety_domain::id::{BrokerId, OfferId, PolicyholderId, ProposalId};
use surety_domain::offer::{OfferDecision, OfferStatus};

use crate::domain::repository::{
    BrokerRepository, OfferRepository, PolicyholderRepository, ProposalRepository,
};
use crate::domain::types::{BondOffer, Broker, Policyholder, Proposal};
use crate::error::PortalError;
use crate::infra::fixtures::PortalSeed;

#[derive(Default)]
struct PortalData {
    brokers: Vec<Broker>,
    policyholders: BTreeMap<PolicyholderId, Policyholder>,
    proposals: BTreeMap<ProposalId, Proposal>,
    offers: BTreeMap<OfferId, BondOffer>,
}

/// In-memory record store standing in for the external database.
/// Clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryPortalStore {
    data: Arc<RwLock<PortalData>>,
}

impl MemoryPortalStore {
    pub fn new(seed: PortalSeed) -> Self {
        let data = PortalData {
            brokers: seed.brokers,
            policyholders: seed.policyholders.into_iter().map(|p| (p.id, p)).collect(),
            proposals: seed.proposals.into_iter().map(|p| (p.id, p)).collect(),
            offers: seed.offers.into_iter().map(|o| (o.id, o)).collect(),
        };
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, PortalData>, PortalError> {
        self.data
            .read()
            .map_err(|_| PortalError::Internal(anyhow!("portal store lock poisoned")))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, PortalData>, PortalError> {
        self.data
            .write()
            .map_err(|_| PortalError::Internal(anyhow!("portal store lock poisoned")))
    }
}

impl BrokerRepository for MemoryPortalStore {
    async fn list(&self) -> Result<Vec<Broker>, PortalError> {
        Ok(self.read()?.brokers.clone())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Broker>, PortalError> {
        Ok(self
            .read()?
            .brokers
            .iter()
            .find(|b| &b.email == email)
            .cloned())
    }

    async fn insert_if_absent(&self, broker: &Broker) -> Result<bool, PortalError> {
        let mut data = self.write()?;
        if data.brokers.iter().any(|b| b.email == broker.email) {
            return Ok(false);
        }
        data.brokers.push(broker.clone());
        Ok(true)
    }
}

impl ProposalRepository for MemoryPortalStore {
    async fn list(&self, owner: Option<BrokerId>) -> Result<Vec<Proposal>, PortalError> {
        Ok(self
            .read()?
            .proposals
            .values()
            .filter(|p| owner.is_none_or(|id| p.broker_id == id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: ProposalId) -> Result<Option<Proposal>, PortalError> {
        Ok(self.read()?.proposals.get(&id).cloned())
    }
}

impl PolicyholderRepository for MemoryPortalStore {
    async fn list(&self, owner: Option<BrokerId>) -> Result<Vec<Policyholder>, PortalError> {
        Ok(self
            .read()?
            .policyholders
            .values()
            .filter(|p| owner.is_none_or(|id| p.broker_id == id))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: PolicyholderId) -> Result<Option<Policyholder>, PortalError> {
        Ok(self.read()?.policyholders.get(&id).cloned())
    }
}

impl OfferRepository for MemoryPortalStore {
    async fn list(&self) -> Result<Vec<BondOffer>, PortalError> {
        Ok(self.read()?.offers.values().cloned().collect())
    }

    async fn find_by_id(&self, id: OfferId) -> Result<Option<BondOffer>, PortalError> {
        Ok(self.read()?.offers.get(&id).cloned())
    }

    async fn apply_decision(
        &self,
        id: OfferId,
        decision: OfferDecision,
        reason: Option<String>,
        at: DateTime<Utc>,
    ) -> Result<BondOffer, PortalError> {
        let mut data = self.write()?;
        let offer = data.offers.get_mut(&id).ok_or(PortalError::OfferNotFound)?;
        offer.status = offer
            .status
            .decide(decision)
            .map_err(|_| PortalError::OfferAlreadyDecided)?;
        offer.decided_at = Some(at);
        if offer.status == OfferStatus::Rejected {
            offer.rejection_reason = reason;
        }
        Ok(offer.clone())
    }
}
