use async_trait::async_trait;
use models::SignupRecord;
use tokio::sync::RwLock;

use super::SignupStore;
use crate::errors::ServiceError;

/// Process-local store, lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Vec<SignupRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_records(records: Vec<SignupRecord>) -> Self {
        Self { inner: RwLock::new(records) }
    }
}

#[async_trait]
impl SignupStore for MemoryStore {
    async fn load(&self) -> Result<Vec<SignupRecord>, ServiceError> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, signups: &[SignupRecord]) -> Result<(), ServiceError> {
        *self.inner.write().await = signups.to_vec();
        Ok(())
    }
}
