use surety_auth_types::identity::Identity;
use surety_domain::id::ProposalId;
use surety_domain::pagination::{Page, PageRequest};
use surety_domain::role::PortalRole;

use crate::domain::repository::ProposalRepository;
use crate::domain::types::Proposal;
use crate::error::PortalError;

pub struct ListProposalsUseCase<P: ProposalRepository> {
    pub proposals: P,
}

impl<P: ProposalRepository> ListProposalsUseCase<P> {
    pub async fn execute(
        &self,
        caller: &Identity,
        page: PageRequest,
    ) -> Result<Page<Proposal>, PortalError> {
        caller.require(PortalRole::Broker)?;
        let owner = (!caller.role.sees_all_records()).then(|| caller.broker_id());
        let all = self.proposals.list(owner).await?;
        Ok(Page::from_vec(all, page))
    }
}

pub struct GetProposalUseCase<P: ProposalRepository> {
    pub proposals: P,
}

impl<P: ProposalRepository> GetProposalUseCase<P> {
    /// Brokers get `ProposalNotFound` for proposals they do not own, so ids of
    /// other brokers' proposals are not confirmed.
    pub async fn execute(&self, caller: &Identity, id: ProposalId) -> Result<Proposal, PortalError> {
        caller.require(PortalRole::Broker)?;
        let proposal = self
            .proposals
            .find_by_id(id)
            .await?
            .ok_or(PortalError::ProposalNotFound)?;
        if !caller.role.sees_all_records() && proposal.broker_id != caller.broker_id() {
            return Err(PortalError::ProposalNotFound);
        }
        Ok(proposal)
    }
}
