//! One-time access PIN.

use std::fmt;

use serde::Serialize;

/// Number of digits in an access PIN.
pub const PIN_LEN: usize = 6;

/// Lowest generated PIN value; keeps issued PINs free of leading zeros.
pub const PIN_MIN: u32 = 100_000;

/// Highest generated PIN value.
pub const PIN_MAX: u32 = 999_999;

/// Six ASCII digits. Any value `000000`–`999999` parses; issuance draws from
/// `PIN_MIN..=PIN_MAX`.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Pin(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("pin must be exactly {PIN_LEN} digits")]
pub struct PinFormatError;

impl Pin {
    pub fn parse(raw: &str) -> Result<Self, PinFormatError> {
        let raw = raw.trim();
        if raw.len() != PIN_LEN || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PinFormatError);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Build a PIN from a generated number in `PIN_MIN..=PIN_MAX`.
    pub fn from_number(n: u32) -> Result<Self, PinFormatError> {
        if !(PIN_MIN..=PIN_MAX).contains(&n) {
            return Err(PinFormatError);
        }
        Ok(Self(n.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare without short-circuiting on the first differing digit.
    pub fn matches(&self, other: &Pin) -> bool {
        let (a, b) = (self.0.as_bytes(), other.0.as_bytes());
        a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

// PINs are credentials; keep them out of debug output.
impl fmt::Debug for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Pin(******)")
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
