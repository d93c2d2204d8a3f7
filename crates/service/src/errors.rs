use thiserror::Error;

use crate::signup::DUPLICATE_EMAIL;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Model(#[from] models::ModelError),
    #[error("{0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("malformed payload: {0}")]
    Payload(String),
}

impl ServiceError {
    pub fn duplicate_email() -> Self { Self::Conflict(DUPLICATE_EMAIL.to_string()) }

    /// Failures the submitter cannot fix; their detail stays in the logs.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Storage(_) | Self::Payload(_))
    }
}
