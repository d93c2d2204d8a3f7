//! Beta signup operations, consumed by every transport adapter.

pub mod service;

use async_trait::async_trait;
use models::SignupRecord;

use crate::{errors::ServiceError, payload::SignupFields};

pub use service::SignupService;

pub const THANK_YOU: &str = "Thank you for signing up! We'll keep you updated.";
pub const DUPLICATE_EMAIL: &str = "This email is already registered for the beta";

/// Outcome of an accepted signup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub message: &'static str,
    pub record: SignupRecord,
}

/// Trait abstraction over the signup operations.
/// Adapters hold an `Arc<dyn SignupApi>` and never see the store.
#[async_trait]
pub trait SignupApi: Send + Sync {
    async fn submit(&self, fields: SignupFields) -> Result<Confirmation, ServiceError>;
    /// Number of stored signups; 0 when the store cannot be read.
    async fn count(&self) -> usize;
}
