use async_trait::async_trait;
use axum::http::HeaderMap;
use jsonwebtoken::{
    decode, decode_header,
    errors::ErrorKind,
    jwk::JwkSet,
    Algorithm, DecodingKey, Validation,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{bearer_token, AuthError, AuthSubject, Authenticator};
use crate::config::AuthConfig;

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
}

/// Verifies RS256 access tokens against the identity provider's JWKS.
///
/// The key set is fetched on first use and refetched once whenever a token
/// names a key id the cached set does not contain.
pub struct JwksAuthenticator {
    jwks_url: Option<String>,
    audience: String,
    issuer: String,
    client: reqwest::Client,
    keys: RwLock<Option<Arc<JwkSet>>>,
}

impl JwksAuthenticator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            jwks_url: Some(config.jwks_url()),
            audience: config.audience.clone(),
            issuer: config.issuer(),
            client: reqwest::Client::new(),
            keys: RwLock::new(None),
        }
    }

    /// Use a fixed key set; never fetches
    pub fn with_key_set(keys: JwkSet, audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            jwks_url: None,
            audience: audience.into(),
            issuer: issuer.into(),
            client: reqwest::Client::new(),
            keys: RwLock::new(Some(Arc::new(keys))),
        }
    }

    async fn fetch_key_set(&self, url: &str) -> Result<Arc<JwkSet>, AuthError> {
        tracing::debug!("Fetching signing keys from {}", url);
        let keys = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?
            .json::<JwkSet>()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        let keys = Arc::new(keys);
        *self.keys.write().await = Some(keys.clone());
        Ok(keys)
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AuthError> {
        let cached = self.keys.read().await.clone();
        if let Some(keys) = &cached {
            if let Some(jwk) = keys.find(kid) {
                return DecodingKey::from_jwk(jwk).map_err(|e| AuthError::InvalidToken(e.to_string()));
            }
        }

        let Some(url) = &self.jwks_url else {
            return Err(AuthError::KeyNotFound);
        };
        let keys = self.fetch_key_set(url).await?;
        let jwk = keys.find(kid).ok_or(AuthError::KeyNotFound)?;
        DecodingKey::from_jwk(jwk).map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::MalformedHeader("Use an RS256 signed JWT Access Token".to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(AuthError::UnsupportedAlgorithm(header.alg));
        }

        let kid = header.kid.ok_or(AuthError::KeyNotFound)?;
        let key = self.decoding_key(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        decode::<Claims>(token, &key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::Expired,
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::ImmatureSignature
                | ErrorKind::MissingRequiredClaim(_) => AuthError::InvalidClaims,
                ErrorKind::InvalidAlgorithm => AuthError::UnsupportedAlgorithm(header.alg),
                _ => AuthError::InvalidToken(e.to_string()),
            })
    }
}

#[async_trait]
impl Authenticator for JwksAuthenticator {
    async fn authenticate(&self, headers: &HeaderMap) -> Result<AuthSubject, AuthError> {
        let token = bearer_token(headers)?;
        let claims = self.verify(token).await.map_err(|e| {
            tracing::debug!("Token rejected: {}", e);
            e
        })?;

        Ok(AuthSubject {
            subject: claims.sub,
            name: claims.name,
        })
    }
}
