//! Stateless function adapter.
//!
//! Takes one serverless-style HTTP event and produces one response, running
//! the same signup service as the HTTP server. Every response carries the
//! permissive CORS headers browsers need to post from another origin.

use std::{collections::BTreeMap, collections::HashMap, sync::Arc};

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use service::{errors::ServiceError, payload::SignupFields, signup::SignupApi};

use crate::{errors::ApiError, routes::signup::signup_outcome};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionEvent {
    pub http_method: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl FunctionEvent {
    /// Header names compare case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn body_bytes(&self) -> Result<Vec<u8>, ServiceError> {
        let body = self.body.as_deref().unwrap_or_default();
        if self.is_base64_encoded {
            STANDARD
                .decode(body)
                .map_err(|e| ServiceError::Payload(format!("base64 body: {e}")))
        } else {
            Ok(body.as_bytes().to_vec())
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl FunctionResponse {
    fn new(status: StatusCode, body: String) -> Self {
        let headers = [
            ("Access-Control-Allow-Origin", "*"),
            ("Access-Control-Allow-Headers", "Content-Type"),
            ("Access-Control-Allow-Methods", "POST, OPTIONS"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self { status_code: status.as_u16(), headers, body }
    }

    fn json<T: Serialize>(status: StatusCode, body: &T) -> Self {
        Self::new(status, serde_json::to_string(body).unwrap_or_default())
    }
}

/// Signup endpoint as a function handler.
#[derive(Clone)]
pub struct SignupFunction {
    signups: Arc<dyn SignupApi>,
}

impl SignupFunction {
    pub fn new(signups: Arc<dyn SignupApi>) -> Self {
        Self { signups }
    }

    pub async fn handle(&self, event: FunctionEvent) -> FunctionResponse {
        match event.http_method.to_ascii_uppercase().as_str() {
            // preflight
            "OPTIONS" => return FunctionResponse::new(StatusCode::OK, String::new()),
            "POST" => {}
            _ => {
                return FunctionResponse::json(
                    StatusCode::METHOD_NOT_ALLOWED,
                    &serde_json::json!({ "error": "Method not allowed" }),
                )
            }
        }

        let fields = match event
            .body_bytes()
            .and_then(|body| SignupFields::from_content(event.header("content-type"), &body))
        {
            Ok(fields) => fields,
            Err(e) => {
                let (status, reply) = ApiError(e).into_parts();
                return FunctionResponse::json(status, &reply);
            }
        };

        let (status, reply) = signup_outcome(self.signups.submit(fields).await);
        FunctionResponse::json(status, &reply)
    }

    /// Decode a raw event document and handle it. An event that cannot be
    /// decoded gets the generic failure response.
    pub async fn handle_raw(&self, raw: &[u8]) -> FunctionResponse {
        match serde_json::from_slice::<FunctionEvent>(raw) {
            Ok(event) => self.handle(event).await,
            Err(e) => {
                let (status, reply) = ApiError(ServiceError::Payload(format!("event: {e}"))).into_parts();
                FunctionResponse::json(status, &reply)
            }
        }
    }
}
