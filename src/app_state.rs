use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::config::Config;
use crate::store::MongoDB;

#[derive(Clone)]
pub struct AppState {
    pub mongodb: Arc<MongoDB>,
    pub config: Config,
    pub assignment_locks: PhoneLocks,
}

/// Advisory per-phone locks. Assignment and reassignment touch a lead
/// document and up to two roster documents with no cross-collection
/// transaction, so concurrent requests for the same phone number are
/// serialized here to keep both sides of the denormalization in sync.
#[derive(Clone, Default)]
pub struct PhoneLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl PhoneLocks {
    /// Acquires the lock for one phone number, creating it on first use. The
    /// registry only ever grows by distinct phone numbers seen, which is
    /// bounded by the lead data itself.
    pub async fn acquire(&self, phone: &str) -> OwnedMutexGuard<()> {
        let slot = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            map.entry(phone.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        slot.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_phone_locks_exclusively() {
        let locks = PhoneLocks::default();
        let guard = locks.acquire("15551234567").await;

        // A second acquire on the same phone must not be ready while the
        // first guard is held.
        let locks2 = locks.clone();
        let pending = tokio::spawn(async move {
            let _g = locks2.acquire("15551234567").await;
        });
        tokio::task::yield_now().await;
        assert!(!pending.is_finished());

        drop(guard);
        pending.await.unwrap();
    }

    #[tokio::test]
    async fn different_phones_do_not_contend() {
        let locks = PhoneLocks::default();
        let _a = locks.acquire("15551234567").await;
        // Completes immediately despite the held lock above.
        let _b = locks.acquire("15557654321").await;
    }
}
