use surety_core::error::FieldViolation;
use surety_domain::email::Email;

pub mod access;
pub mod broker;
pub mod offer;
pub mod policyholder;
pub mod proposal;

/// Collects field violations while a request body is checked, so the caller
/// gets every problem in one response.
#[derive(Default)]
pub(crate) struct Violations(Vec<FieldViolation>);

impl Violations {
    pub(crate) fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldViolation::new(field, message));
    }

    /// Parse a required email field.
    pub(crate) fn email(&mut self, field: &str, value: Option<String>) -> Option<Email> {
        match value {
            None => {
                self.push(field, format!("{field} is required"));
                None
            }
            Some(raw) => Email::parse(&raw)
                .map_err(|e| self.push(field, e.to_string()))
                .ok(),
        }
    }

    /// Require a non-blank text field, returning it trimmed.
    pub(crate) fn text(&mut self, field: &str, value: Option<String>) -> Option<String> {
        match value.map(|v| v.trim().to_owned()) {
            Some(v) if !v.is_empty() => Some(v),
            _ => {
                self.push(field, format!("{field} is required"));
                None
            }
        }
    }

    pub(crate) fn into_result(self) -> Result<(), crate::error::PortalError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(crate::error::PortalError::Validation(self.0))
        }
    }
}
