use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use common::types::{CountReply, SignupReply};
use service::{errors::ServiceError, signup::Confirmation};

use crate::{errors::ApiError, extract::SignupForm, observability, routes::ServerState};

/// Map a submit result to the status and body every adapter returns.
pub fn signup_outcome(result: Result<Confirmation, ServiceError>) -> (StatusCode, SignupReply) {
    match result {
        Ok(confirmation) => {
            observability::SIGNUPS_ACCEPTED_TOTAL.inc();
            (StatusCode::OK, SignupReply::success(confirmation.message))
        }
        Err(e) => ApiError(e).into_parts(),
    }
}

/// `POST /api/beta-signup`
pub async fn submit(
    State(state): State<ServerState>,
    SignupForm(fields): SignupForm,
) -> impl IntoResponse {
    let (status, reply) = signup_outcome(state.signups.submit(fields).await);
    (status, Json(reply))
}

/// `GET /api/beta-count`
pub async fn count(State(state): State<ServerState>) -> Json<CountReply> {
    Json(CountReply { count: state.signups.count().await })
}
