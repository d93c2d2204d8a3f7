use chrono::{DateTime, SubsecRound, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// `local@domain.tld`: no whitespace or `@` in any of the three parts.
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex"));

/// A validated, normalized beta signup as persisted in the store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SignupRecord {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub monthly_orders: String,
    #[serde(default)]
    pub return_rate: String,
    #[serde(default)]
    pub categories: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
}

/// Raw submission after transport decoding; nothing here is trusted yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub platform: Option<String>,
    pub monthly_orders: Option<String>,
    pub return_rate: Option<String>,
    pub categories: Option<String>,
}

impl SignupInput {
    /// Validate and normalize into a record stamped with `now`.
    ///
    /// `now` is truncated to milliseconds so the record compares equal to
    /// its persisted form.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<SignupRecord, ModelError> {
        let name = non_blank(self.name.as_deref());
        let email = non_blank(self.email.as_deref());
        let (Some(name), Some(email)) = (name, email) else {
            return Err(ModelError::MissingRequired);
        };
        validate_email(email)?;

        Ok(SignupRecord {
            name: name.to_string(),
            email: normalize_email(email),
            company: self.company.unwrap_or_default(),
            platform: self.platform.unwrap_or_default(),
            monthly_orders: self.monthly_orders.unwrap_or_default(),
            return_rate: self.return_rate.unwrap_or_default(),
            categories: self.categories.unwrap_or_default(),
            timestamp: now.trunc_subsecs(3),
        })
    }
}

fn non_blank(s: Option<&str>) -> Option<&str> {
    s.map(str::trim).filter(|s| !s.is_empty())
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    if EMAIL_RE.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ModelError::InvalidEmail)
    }
}

/// Key used for duplicate detection.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// RFC 3339 with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        DateTime::<Utc>::deserialize(d)
    }
}
