use crate::domain::repository::PinNotifier;
use crate::domain::types::AccessCodeRecord;
use crate::error::PortalError;

/// Stand-in for the mail gateway: records the delivery in the service log.
///
/// The PIN itself is only emitted at `debug` level.
#[derive(Clone, Default)]
pub struct LogPinNotifier;

impl PinNotifier for LogPinNotifier {
    async fn deliver(&self, record: &AccessCodeRecord, link: &str) -> Result<(), PortalError> {
        tracing::info!(
            email = %record.email,
            expires_at = %record.expires_at,
            %link,
            "access code issued"
        );
        tracing::debug!(email = %record.email, pin = %record.pin, "access code pin");
        Ok(())
    }
}
