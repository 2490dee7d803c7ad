//! Response envelope and bearer-identity helpers shared by every router.
//!
//! All endpoints answer `{status, success, data | error}`.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::auth::collaborators::IdentityVerifier;
use crate::auth::domain::AuthContext;
use crate::error::DomainError;

pub fn success(status: StatusCode, data: impl Serialize) -> Response {
    let body = Json(json!({
        "status": status.as_u16(),
        "success": true,
        "data": data,
    }));
    (status, body).into_response()
}

/// Resolve the `Authorization: Bearer` header through the identity
/// collaborator. The core never inspects the token itself.
pub fn authenticate(
    headers: &HeaderMap,
    identity: &dyn IdentityVerifier,
) -> Result<AuthContext, DomainError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(DomainError::Unauthenticated)?;

    let token = raw
        .strip_prefix("Bearer ")
        .or_else(|| raw.strip_prefix("bearer "))
        .ok_or(DomainError::Unauthenticated)?
        .trim();

    if token.is_empty() {
        return Err(DomainError::Unauthenticated);
    }

    identity.verify(token)
}
