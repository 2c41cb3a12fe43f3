use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

/// Identity forwarded by the upstream auth gateway.
///
/// The gateway authenticates the request and sets `X-User-Id`; this core
/// only reads it. `None` is an anonymous caller, which listings treat as
/// "no results" and mutations reject with 401.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<String>);

impl Caller {
    pub fn id(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// The caller's id, or `Unauthenticated` for endpoints that need one.
    pub fn required(&self) -> Result<&str, ApiError> {
        self.id().ok_or(ApiError::Unauthenticated)
    }
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get("x-user-id")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        Ok(Caller(id))
    }
}
