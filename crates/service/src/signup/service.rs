use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use models::normalize_email;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use super::{Confirmation, SignupApi, THANK_YOU};
use crate::errors::ServiceError;
use crate::payload::SignupFields;
use crate::storage::SignupStore;

/// Application service encapsulating the signup rules.
///
/// Load, duplicate check, append and save run under one lock, so two
/// submissions through the same service cannot both register an email.
/// Writers in other processes sharing the file are not coordinated.
pub struct SignupService<S: SignupStore> {
    store: Arc<S>,
    write_lock: Mutex<()>,
}

impl<S: SignupStore> SignupService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store, write_lock: Mutex::new(()) }
    }

    #[instrument(skip_all, fields(fields = fields.len()))]
    pub async fn submit(&self, fields: SignupFields) -> Result<Confirmation, ServiceError> {
        let record = fields.into_input().into_record(Utc::now())?;

        let guard = self.write_lock.lock().await;
        let mut signups = self.store.load().await?;
        if signups.iter().any(|s| normalize_email(&s.email) == record.email) {
            debug!(email = %record.email, "duplicate beta signup");
            return Err(ServiceError::duplicate_email());
        }
        signups.push(record.clone());
        self.store.save(&signups).await?;
        drop(guard);

        info!(
            name = %record.name,
            email = %record.email,
            company = %record.company,
            platform = %record.platform,
            monthly_orders = %record.monthly_orders,
            return_rate = %record.return_rate,
            categories = %record.categories,
            timestamp = %record.timestamp,
            total = signups.len(),
            "new beta signup"
        );
        Ok(Confirmation { message: THANK_YOU, record })
    }

    pub async fn count(&self) -> usize {
        match self.store.load().await {
            Ok(signups) => signups.len(),
            Err(e) => {
                debug!(error = %e, "signup store unreadable; reporting zero");
                0
            }
        }
    }
}

#[async_trait]
impl<S: SignupStore + 'static> SignupApi for SignupService<S> {
    async fn submit(&self, fields: SignupFields) -> Result<Confirmation, ServiceError> { self.submit(fields).await }
    async fn count(&self) -> usize { self.count().await }
}
