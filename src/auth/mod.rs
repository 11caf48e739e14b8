pub mod jwks;

use async_trait::async_trait;
use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::Algorithm;
use thiserror::Error;

pub use jwks::JwksAuthenticator;

/// Identity of a verified caller
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthSubject {
    /// Stable identifier from the identity provider (`sub` claim)
    pub subject: String,
    /// Display name, when the token carries one
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Invalid header. {0}")]
    MalformedHeader(String),

    #[error("Invalid header. Use an RS256 signed JWT Access Token (got {0:?})")]
    UnsupportedAlgorithm(Algorithm),

    #[error("token is expired")]
    Expired,

    #[error("incorrect claims, please check the audience and issuer")]
    InvalidClaims,

    #[error("No RSA key in JWKS matches the token")]
    KeyNotFound,

    #[error("Unable to parse authentication token: {0}")]
    InvalidToken(String),

    #[error("Signing keys unavailable: {0}")]
    KeySetUnavailable(String),
}

impl AuthError {
    /// Machine-readable reason reported to clients
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::MissingHeader => "no auth header",
            AuthError::MalformedHeader(_) => "invalid_header",
            AuthError::UnsupportedAlgorithm(_) => "invalid_header",
            AuthError::Expired => "token_expired",
            AuthError::InvalidClaims => "invalid_claims",
            AuthError::KeyNotFound => "no_rsa_key",
            AuthError::InvalidToken(_) => "invalid_header",
            AuthError::KeySetUnavailable(_) => "jwks_unavailable",
        }
    }
}

/// Verifies the credentials carried by a request
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthSubject, AuthError>;
}

/// Extract the bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let auth_header = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Authorization header is not valid text".to_string()))?;

    let token = auth_str
        .strip_prefix("Bearer ")
        .or_else(|| auth_str.strip_prefix("bearer "))
        .ok_or_else(|| AuthError::MalformedHeader("Authorization header must use Bearer token format".to_string()))?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MalformedHeader("Empty bearer token".to_string()));
    }
    Ok(token)
}
