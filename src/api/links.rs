use std::convert::Infallible;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::HOST, request::Parts, HeaderMap};
use url::Url;

use crate::database::store::Kind;
use crate::state::AppState;

/// Absolute URLs for resources, rooted at the base the client used to reach us
#[derive(Clone, Debug)]
pub struct Links {
    base: Url,
}

impl Links {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    /// Base from the `Host` header, else `fallback`
    pub fn from_headers(headers: &HeaderMap, scheme: &str, fallback: &Url) -> Self {
        let from_host = headers
            .get(HOST)
            .and_then(|value| value.to_str().ok())
            .filter(|host| !host.is_empty())
            .and_then(|host| Url::parse(&format!("{}://{}/", scheme, host)).ok())
            .filter(|url| url.host_str().is_some());

        Self::new(from_host.unwrap_or_else(|| fallback.clone()))
    }

    fn at(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    pub fn entity(&self, kind: Kind, id: u64) -> String {
        self.at(&[kind.as_str(), &id.to_string()]).into()
    }

    pub fn vessel(&self, id: u64) -> String {
        self.entity(Kind::Vessels, id)
    }

    pub fn cargo_item(&self, id: u64) -> String {
        self.entity(Kind::CargoItems, id)
    }

    /// Collection URL for one page
    pub fn page(&self, kind: Kind, limit: u64, offset: u64) -> String {
        let mut url = self.at(&[kind.as_str()]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string())
            .append_pair("offset", &offset.to_string());
        url.into()
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Links {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Links::from_headers(
            &parts.headers,
            &state.config.server.public_scheme,
            &state.base_url,
        ))
    }
}
