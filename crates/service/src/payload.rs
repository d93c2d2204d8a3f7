//! Submission bodies, decoded into a flat `field -> text` mapping.
//!
//! JSON objects and URL-encoded forms land in the same shape so the signup
//! rules never see which encoding the caller used.

use std::collections::BTreeMap;

use models::SignupInput;
use serde_json::Value;

use crate::errors::ServiceError;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupFields(BTreeMap<String, String>);

impl SignupFields {
    pub fn new() -> Self { Self::default() }

    /// Pick the decoder from a `Content-Type` value; anything that is not
    /// JSON is read as a URL-encoded form.
    pub fn from_content(content_type: Option<&str>, body: &[u8]) -> Result<Self, ServiceError> {
        let is_json = content_type
            .map(|ct| ct.to_ascii_lowercase().contains("application/json"))
            .unwrap_or(false);
        if is_json {
            Self::from_json(body)
        } else {
            Self::from_urlencoded(body)
        }
    }

    /// A `null` document is a payload error. Other non-object documents
    /// decode to an empty mapping; `null` members are dropped.
    pub fn from_json(body: &[u8]) -> Result<Self, ServiceError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| ServiceError::Payload(e.to_string()))?;
        let obj = match value {
            Value::Object(obj) => obj,
            Value::Null => return Err(ServiceError::Payload("null JSON body".into())),
            _ => return Ok(Self::default()),
        };
        Ok(obj
            .into_iter()
            .filter_map(|(k, v)| value_to_text(v).map(|v| (k, v)))
            .collect())
    }

    /// Repeated keys keep the last value.
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, ServiceError> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(body).map_err(|e| ServiceError::Payload(e.to_string()))?;
        Ok(pairs.into_iter().collect())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize { self.0.len() }

    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    pub fn into_input(mut self) -> SignupInput {
        SignupInput {
            name: self.0.remove("name"),
            email: self.0.remove("email"),
            company: self.0.remove("company"),
            platform: self.0.remove("platform"),
            monthly_orders: self.0.remove("monthlyOrders"),
            return_rate: self.0.remove("returnRate"),
            categories: self.0.remove("categories"),
        }
    }
}

impl FromIterator<(String, String)> for SignupFields {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn value_to_text(v: Value) -> Option<String> {
    match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        // multi-select inputs arrive as arrays
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(value_to_text)
                .collect::<Vec<_>>()
                .join(","),
        ),
        obj @ Value::Object(_) => Some(obj.to_string()),
    }
}
