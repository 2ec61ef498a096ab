use chrono::Utc;
use uuid::Uuid;

use surety_auth_types::identity::Identity;
use surety_domain::email::Email;
use surety_domain::id::BrokerId;
use surety_domain::role::PortalRole;

use crate::domain::repository::BrokerRepository;
use crate::domain::types::Broker;
use crate::error::PortalError;

// ── RegisterBroker ───────────────────────────────────────────────────────────

pub struct RegisterBrokerInput {
    pub name: String,
    pub email: Email,
    pub company: String,
    pub license_number: String,
}

pub struct RegisterBrokerUseCase<B: BrokerRepository> {
    pub brokers: B,
}

impl<B: BrokerRepository> RegisterBrokerUseCase<B> {
    pub async fn execute(&self, input: RegisterBrokerInput) -> Result<Broker, PortalError> {
        let broker = Broker {
            id: BrokerId(Uuid::new_v4()),
            name: input.name,
            email: input.email,
            company: input.company,
            license_number: input.license_number,
            registered_at: Utc::now(),
        };
        if !self.brokers.insert_if_absent(&broker).await? {
            return Err(PortalError::BrokerAlreadyExists);
        }
        tracing::info!(broker_id = %broker.id, email = %broker.email, "broker registered");
        Ok(broker)
    }
}

// ── ListBrokers ──────────────────────────────────────────────────────────────

pub struct ListBrokersUseCase<B: BrokerRepository> {
    pub brokers: B,
}

impl<B: BrokerRepository> ListBrokersUseCase<B> {
    pub async fn execute(&self, caller: &Identity) -> Result<Vec<Broker>, PortalError> {
        caller.require(PortalRole::Admin)?;
        self.brokers.list().await
    }
}
