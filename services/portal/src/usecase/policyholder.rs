use surety_auth_types::identity::Identity;
use surety_domain::id::PolicyholderId;
use surety_domain::pagination::{Page, PageRequest};
use surety_domain::role::PortalRole;

use crate::domain::repository::PolicyholderRepository;
use crate::domain::types::Policyholder;
use crate::error::PortalError;

pub struct ListPolicyholdersUseCase<P: PolicyholderRepository> {
    pub policyholders: P,
}

impl<P: PolicyholderRepository> ListPolicyholdersUseCase<P> {
    pub async fn execute(
        &self,
        caller: &Identity,
        page: PageRequest,
    ) -> Result<Page<Policyholder>, PortalError> {
        caller.require(PortalRole::Broker)?;
        let owner = (!caller.role.sees_all_records()).then(|| caller.broker_id());
        let all = self.policyholders.list(owner).await?;
        Ok(Page::from_vec(all, page))
    }
}

pub struct GetPolicyholderUseCase<P: PolicyholderRepository> {
    pub policyholders: P,
}

impl<P: PolicyholderRepository> GetPolicyholderUseCase<P> {
    pub async fn execute(
        &self,
        caller: &Identity,
        id: PolicyholderId,
    ) -> Result<Policyholder, PortalError> {
        caller.require(PortalRole::Broker)?;
        let holder = self
            .policyholders
            .find_by_id(id)
            .await?
            .ok_or(PortalError::PolicyholderNotFound)?;
        if !caller.role.sees_all_records() && holder.broker_id != caller.broker_id() {
            return Err(PortalError::PolicyholderNotFound);
        }
        Ok(holder)
    }
}
