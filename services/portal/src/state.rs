use std::sync::Arc;

use axum::extract::FromRef;

use surety_auth_types::identity::SessionKey;
use surety_auth_types::link_token::TimeLimitedTokenCodec;

use crate::config::PortalConfig;
use crate::infra::access_codes::MemoryAccessCodeStore;
use crate::infra::fixtures::PortalSeed;
use crate::infra::memory::MemoryPortalStore;
use crate::infra::notifier::LogPinNotifier;

/// Runtime settings handlers need beyond the stores.
#[derive(Debug, Clone)]
pub struct PortalSettings {
    /// Echo issued PINs in the access-request response (mock mode only).
    pub echo_pin: bool,
    pub public_base_url: String,
    pub access_code_ttl_secs: i64,
    pub invitation_ttl_secs: i64,
}

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub access_codes: MemoryAccessCodeStore,
    pub store: MemoryPortalStore,
    pub codec: Arc<TimeLimitedTokenCodec>,
    pub session_key: SessionKey,
    pub settings: Arc<PortalSettings>,
}

impl AppState {
    pub fn new(config: &PortalConfig, seed: PortalSeed) -> Self {
        Self {
            access_codes: MemoryAccessCodeStore::new(),
            store: MemoryPortalStore::new(seed),
            codec: Arc::new(TimeLimitedTokenCodec::new(config.token_secret.as_bytes())),
            session_key: SessionKey::new(config.session_secret.as_str()),
            settings: Arc::new(PortalSettings {
                echo_pin: config.use_mock_data,
                public_base_url: config.public_base_url.clone(),
                access_code_ttl_secs: config.access_code_ttl_secs,
                invitation_ttl_secs: config.invitation_ttl_secs,
            }),
        }
    }

    pub fn from_config(config: &PortalConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let seed = PortalSeed::for_mode(config.use_mock_data)?;
        Ok(Self::new(config, seed))
    }

    pub fn access_code_repo(&self) -> MemoryAccessCodeStore {
        self.access_codes.clone()
    }

    pub fn pin_notifier(&self) -> LogPinNotifier {
        LogPinNotifier
    }

    pub fn broker_repo(&self) -> MemoryPortalStore {
        self.store.clone()
    }

    pub fn proposal_repo(&self) -> MemoryPortalStore {
        self.store.clone()
    }

    pub fn policyholder_repo(&self) -> MemoryPortalStore {
        self.store.clone()
    }

    pub fn offer_repo(&self) -> MemoryPortalStore {
        self.store.clone()
    }
}

impl FromRef<AppState> for SessionKey {
    fn from_ref(state: &AppState) -> Self {
        state.session_key.clone()
    }
}
