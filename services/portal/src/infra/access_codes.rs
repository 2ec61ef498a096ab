use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use surety_domain::email::Email;
use surety_domain::pin::Pin;

use crate::domain::repository::{AccessCodeRepository, ConsumeError};
use crate::domain::types::AccessCodeRecord;

/// Process-local access-code store. Clones share the same mapping.
///
/// One mutex guards the whole map; no operation awaits while holding it.
#[derive(Clone, Default)]
pub struct MemoryAccessCodeStore {
    codes: Arc<Mutex<HashMap<Email, AccessCodeRecord>>>,
}

impl MemoryAccessCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the lock cannot leave a half-written record
    // (every mutation is a single map call), so a poisoned map is still sound.
    fn lock(&self) -> MutexGuard<'_, HashMap<Email, AccessCodeRecord>> {
        self.codes.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop every record whose PIN has expired. Returns how many were removed.
    pub fn purge_expired(&self, now: DateTime<Utc>) -> usize {
        let mut codes = self.lock();
        let before = codes.len();
        codes.retain(|_, record| !record.is_expired(now));
        before - codes.len()
    }
}

impl AccessCodeRepository for MemoryAccessCodeStore {
    fn upsert(&self, record: AccessCodeRecord) {
        self.lock().insert(record.email.clone(), record);
    }

    fn get(&self, email: &Email) -> Option<AccessCodeRecord> {
        self.lock().get(email).cloned()
    }

    fn remove(&self, email: &Email) {
        self.lock().remove(email);
    }

    fn consume(
        &self,
        email: &Email,
        pin: &Pin,
        now: DateTime<Utc>,
    ) -> Result<AccessCodeRecord, ConsumeError> {
        let mut codes = self.lock();
        let record = codes.get(email).ok_or(ConsumeError::NotFound)?;
        if record.is_expired(now) {
            codes.remove(email);
            return Err(ConsumeError::Expired);
        }
        if !record.pin.matches(pin) {
            return Err(ConsumeError::Mismatch);
        }
        codes.remove(email).ok_or(ConsumeError::NotFound)
    }
}
