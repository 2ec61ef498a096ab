//! Bundled seed data served in mock mode.

use anyhow::Context;

use crate::domain::types::{BondOffer, Broker, Policyholder, Proposal};

const BROKERS_JSON: &str = include_str!("../../fixtures/brokers.json");
const POLICYHOLDERS_JSON: &str = include_str!("../../fixtures/policyholders.json");
const PROPOSALS_JSON: &str = include_str!("../../fixtures/proposals.json");
const OFFERS_JSON: &str = include_str!("../../fixtures/offers.json");

/// Initial contents of the in-memory portal store.
#[derive(Debug, Clone, Default)]
pub struct PortalSeed {
    pub brokers: Vec<Broker>,
    pub policyholders: Vec<Policyholder>,
    pub proposals: Vec<Proposal>,
    pub offers: Vec<BondOffer>,
}

impl PortalSeed {
    /// Parse the JSON fixtures compiled into the binary.
    pub fn bundled() -> anyhow::Result<Self> {
        Ok(Self {
            brokers: serde_json::from_str(BROKERS_JSON).context("parsing brokers.json")?,
            policyholders: serde_json::from_str(POLICYHOLDERS_JSON)
                .context("parsing policyholders.json")?,
            proposals: serde_json::from_str(PROPOSALS_JSON).context("parsing proposals.json")?,
            offers: serde_json::from_str(OFFERS_JSON).context("parsing offers.json")?,
        })
    }

    /// Seed for mock mode, or an empty store when real data lives elsewhere.
    pub fn for_mode(use_mock_data: bool) -> anyhow::Result<Self> {
        if use_mock_data {
            Self::bundled()
        } else {
            Ok(Self::default())
        }
    }
}
