use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Per-test write locks. Two administrators submitting question batches for
/// the same test are serialized; disjoint tests proceed concurrently.
/// Entries are a few words each and live for the process lifetime.
#[derive(Clone, Default)]
pub struct TestLocks {
    inner: Arc<Mutex<HashMap<String, Arc<AsyncMutex<()>>>>>,
}

impl TestLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, test_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().expect("test lock registry poisoned");
            map.entry(test_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}
