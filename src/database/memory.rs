use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use super::store::{DocumentStore, Kind, Page, Query, StoreResult};

/// In-process document store used for development and tests
pub struct MemoryStore {
    next_id: AtomicU64,
    tables: RwLock<HashMap<Kind, BTreeMap<u64, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            tables: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn allocate_id(&self, _kind: Kind) -> StoreResult<u64> {
        Ok(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    async fn put(&self, kind: Kind, id: u64, body: Value) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.entry(kind).or_default().insert(id, body);
        Ok(())
    }

    async fn get(&self, kind: Kind, id: u64) -> StoreResult<Option<Value>> {
        let tables = self.tables.read().await;
        Ok(tables.get(&kind).and_then(|t| t.get(&id)).cloned())
    }

    async fn delete(&self, kind: Kind, id: u64) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if let Some(table) = tables.get_mut(&kind) {
            table.remove(&id);
        }
        Ok(())
    }

    async fn query(&self, query: Query) -> StoreResult<Page<Value>> {
        let tables = self.tables.read().await;
        let Some(table) = tables.get(&query.kind) else {
            return Ok(Page { items: Vec::new(), more: false });
        };

        let mut matching = table
            .values()
            .filter(|body| query.filter.as_ref().map_or(true, |f| f.matches(body)))
            .skip(usize::try_from(query.offset).unwrap_or(usize::MAX));

        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        let items: Vec<Value> = matching.by_ref().take(limit).cloned().collect();
        let more = matching.next().is_some();

        Ok(Page { items, more })
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
