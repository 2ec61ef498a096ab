//! Portal role types.

use serde::{Deserialize, Serialize};

/// Portal permission level carried in the session token.
///
/// Wire format: `u8` (0 = Broker, 1 = Underwriter, 2 = Admin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortalRole {
    Broker = 0,
    Underwriter = 1,
    Admin = 2,
}

impl PortalRole {
    /// Convert from `u8` wire value. Returns `None` for unknown values.
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Broker),
            1 => Some(Self::Underwriter),
            2 => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert to `u8` wire value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Brokers only ever see records they own.
    pub fn sees_all_records(self) -> bool {
        self >= Self::Underwriter
    }
}

impl PartialOrd for PortalRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PortalRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_u8().cmp(&other.as_u8())
    }
}
