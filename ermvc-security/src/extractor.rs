use axum::extract::{FromRequestParts, OptionalFromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;

use crate::error::SecurityError;

/// Identity attached to a request by [`authenticate`](crate::authenticate).
///
/// ```ignore
/// async fn profile(user: AuthenticatedUser) -> String {
///     format!("Hello, {}!", user.sub().unwrap_or("stranger"))
/// }
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    claims: serde_json::Value,
}

impl AuthenticatedUser {
    pub fn from_claims(claims: serde_json::Value) -> Self {
        Self { claims }
    }

    /// The `sub` claim, as a string or a number rendered to string.
    pub fn sub(&self) -> Option<String> {
        match self.claims.get("sub")? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn claim(&self, key: &str) -> Option<&serde_json::Value> {
        self.claims.get(key)
    }

    pub fn claims(&self) -> &serde_json::Value {
        &self.claims
    }

    pub fn into_claims(self) -> serde_json::Value {
        self.claims
    }
}

/// The token of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, SecurityError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(SecurityError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| SecurityError::InvalidAuthScheme)?;

    match value.split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("Bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(SecurityError::InvalidAuthScheme),
    }
}

/// Requires the `authenticate` middleware on the route; without it every
/// request is rejected with 401.
impl<S: Send + Sync> FromRequestParts<S> for AuthenticatedUser {
    type Rejection = SecurityError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(SecurityError::MissingAuthHeader)
    }
}

/// `Option<AuthenticatedUser>`: `None` on routes without a verified token.
impl<S: Send + Sync> OptionalFromRequestParts<S> for AuthenticatedUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthenticatedUser>().cloned())
    }
}
