use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::header,
};
use service::{errors::ServiceError, payload::SignupFields};

use crate::errors::ApiError;

/// Signup body in any accepted encoding: JSON, URL-encoded form, or the
/// text parts of a multipart form. Undecodable bodies reject as an internal
/// error.
#[derive(Debug)]
pub struct SignupForm(pub SignupFields);

#[async_trait]
impl<S> FromRequest<S> for SignupForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let is_multipart = content_type
            .as_deref()
            .is_some_and(|ct| ct.to_ascii_lowercase().starts_with("multipart/form-data"));
        if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ServiceError::Payload(e.body_text()))?;
            return read_multipart(multipart).await.map(Self).map_err(ApiError::from);
        }

        let body = Bytes::from_request(req, state)
            .await
            .map_err(|e| ServiceError::Payload(e.body_text()))?;
        SignupFields::from_content(content_type.as_deref(), &body)
            .map(Self)
            .map_err(ApiError::from)
    }
}

async fn read_multipart(mut multipart: Multipart) -> Result<SignupFields, ServiceError> {
    let mut fields = SignupFields::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Payload(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_owned) else { continue };
        // uploads carry nothing a signup needs
        if field.file_name().is_some() {
            continue;
        }
        let value = field.text().await.map_err(|e| ServiceError::Payload(e.to_string()))?;
        fields.insert(name, value);
    }
    Ok(fields)
}
