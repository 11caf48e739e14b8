use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use super::links::Links;
use crate::config::PaginationConfig;
use crate::database::models::Entity;
use crate::database::repository::Repository;
use crate::database::store::{Filter, Kind, StoreResult};
use crate::services::{DomainError, DomainResult};

/// Raw `limit` / `offset` query parameters
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// A validated window into a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

impl PageParams {
    pub fn resolve(&self, config: &PaginationConfig) -> DomainResult<PageWindow> {
        let limit = match self.limit.as_deref() {
            Some(raw) => parse_count("limit", raw)?,
            None => config.default_limit,
        };
        if limit == 0 || limit > config.max_limit {
            return Err(DomainError::invalid_attribute(format!(
                "limit must be between 1 and {}",
                config.max_limit
            )));
        }

        let offset = match self.offset.as_deref() {
            Some(raw) => parse_count("offset", raw)?,
            None => 0,
        };

        Ok(PageWindow { limit, offset })
    }
}

fn parse_count(name: &str, raw: &str) -> DomainResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| DomainError::invalid_attribute(format!("{} must be a non-negative integer", name)))
}

impl PageWindow {
    pub fn next_offset(&self, more: bool) -> Option<u64> {
        more.then(|| self.offset + self.limit)
    }
}

/// Fetch one page, optionally restricted by `filter`
pub async fn list<T: Entity>(
    repo: &Repository<T>,
    filter: Option<Filter>,
    window: PageWindow,
) -> StoreResult<(Vec<T>, Option<u64>)> {
    let page = repo.select_page(filter, window.limit, window.offset).await?;
    Ok((page.items, window.next_offset(page.more)))
}

/// One page of a collection as returned to clients.
///
/// Items are keyed by the collection name (`"vessels": [...]`).
#[derive(Debug)]
pub struct Listing<T> {
    kind: Kind,
    items: Vec<T>,
    next_offset: Option<u64>,
    next: Option<String>,
}

impl<T> Listing<T> {
    pub fn new(kind: Kind, items: Vec<T>, window: PageWindow, next_offset: Option<u64>, links: &Links) -> Self {
        let next = next_offset.map(|offset| links.page(kind, window.limit, offset));
        Self {
            kind,
            items,
            next_offset,
            next,
        }
    }
}

impl<T: Serialize> Serialize for Listing<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(self.kind.as_str(), &self.items)?;
        if let Some(offset) = self.next_offset {
            map.serialize_entry("next_offset", &offset)?;
        }
        if let Some(next) = &self.next {
            map.serialize_entry("next", next)?;
        }
        map.end()
    }
}
