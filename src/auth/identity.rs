use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use std::fmt;

use super::{decode_jwt, JwtError};

/// Caller identity resolved for a single request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AuthenticatedUser(String);

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthenticatedUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolves who is calling.
///
/// `Ok(None)` means the request is not authenticated. `Err` is reserved for
/// the provider itself failing.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve_caller(&self, headers: &HeaderMap) -> anyhow::Result<Option<AuthenticatedUser>>;
}

/// Bearer-token identity backed by HS256 JWTs
#[derive(Clone)]
pub struct JwtIdentityProvider {
    secret: String,
}

impl JwtIdentityProvider {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn resolve_caller(&self, headers: &HeaderMap) -> anyhow::Result<Option<AuthenticatedUser>> {
        let token = match extract_bearer_token(headers) {
            Ok(token) => token,
            Err(reason) => {
                tracing::debug!("No caller identity: {}", reason);
                return Ok(None);
            }
        };

        match decode_jwt(token, &self.secret) {
            Ok(claims) if !claims.sub.trim().is_empty() => Ok(Some(AuthenticatedUser::new(claims.sub))),
            Ok(_) => {
                tracing::warn!("JWT accepted but carries an empty subject");
                Ok(None)
            }
            Err(JwtError::InvalidSecret) => Err(JwtError::InvalidSecret.into()),
            Err(e) => {
                tracing::warn!("Rejected bearer token: {}", e);
                Ok(None)
            }
        }
    }
}

/// Extract JWT token from Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .ok_or("Missing Authorization header")?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .ok_or("Authorization header must use Bearer token format")?
        .trim();

    if token.is_empty() {
        return Err("Empty JWT token");
    }
    Ok(token)
}
