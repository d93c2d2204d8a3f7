use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::SignupReply;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

use crate::observability;

/// Message returned for every failure the submitter cannot fix.
pub const GENERIC_FAILURE: &str = "An error occurred. Please try again.";

/// Signup failure on its way out of an adapter.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ServiceError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        if self.0.is_internal() {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::BAD_REQUEST
        }
    }

    /// Status and body for the caller. Internal detail is logged here and
    /// replaced by the generic message.
    pub fn into_parts(self) -> (StatusCode, SignupReply) {
        let status = self.status();
        if self.0.is_internal() {
            observability::SIGNUPS_FAILED_TOTAL.inc();
            error!(error = %self.0, "error processing beta signup");
            (status, SignupReply::failure(GENERIC_FAILURE))
        } else {
            observability::SIGNUPS_REJECTED_TOTAL.inc();
            (status, SignupReply::failure(self.0.to_string()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reply) = self.into_parts();
        (status, Json(reply)).into_response()
    }
}
