//! Bond offer lifecycle.

use serde::{Deserialize, Serialize};

/// Where a bond offer stands with the policyholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Response given through an invitation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferDecision {
    Accept,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("offer already {0:?}")]
pub struct AlreadyDecided(pub OfferStatus);

impl OfferStatus {
    /// Apply a decision. Only `Pending` offers can move; decided offers are final.
    pub fn decide(self, decision: OfferDecision) -> Result<Self, AlreadyDecided> {
        match self {
            Self::Pending => Ok(match decision {
                OfferDecision::Accept => Self::Accepted,
                OfferDecision::Reject => Self::Rejected,
            }),
            decided => Err(AlreadyDecided(decided)),
        }
    }

    pub fn is_pending(self) -> bool {
        self == Self::Pending
    }
}
