use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::database::models::Entity;
use crate::database::store::{DocumentStore, Filter, Page, Query, StoreError, StoreResult};

/// Page size used when a caller walks an entire kind
const SCAN_BATCH: u64 = 100;

/// Typed access to one kind of document
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            _phantom: PhantomData,
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: PhantomData,
        }
    }

    pub async fn next_id(&self) -> StoreResult<u64> {
        self.store.allocate_id(T::KIND).await
    }

    pub async fn select_one(&self, id: u64) -> StoreResult<Option<T>> {
        match self.store.get(T::KIND, id).await? {
            Some(body) => decode(id, body).map(Some),
            None => Ok(None),
        }
    }

    pub async fn select_404(&self, id: u64) -> StoreResult<T> {
        self.select_one(id)
            .await?
            .ok_or(StoreError::NotFound { kind: T::KIND, id })
    }

    pub async fn select_page(&self, filter: Option<Filter>, limit: u64, offset: u64) -> StoreResult<Page<T>> {
        let mut query = Query::new(T::KIND).page(limit, offset);
        query.filter = filter;
        self.store.query(query).await?.try_map(decode_body)
    }

    pub async fn select_first(&self, filter: Filter) -> StoreResult<Option<T>> {
        let page = self.select_page(Some(filter), 1, 0).await?;
        Ok(page.items.into_iter().next())
    }

    /// Walk every document of this kind in id order
    pub async fn select_all(&self) -> StoreResult<Vec<T>> {
        let mut all = Vec::new();
        let mut offset = 0;
        loop {
            let page = self.select_page(None, SCAN_BATCH, offset).await?;
            all.extend(page.items);
            if !page.more {
                return Ok(all);
            }
            offset += SCAN_BATCH;
        }
    }

    pub async fn save(&self, entity: &T) -> StoreResult<()> {
        let body = serde_json::to_value(entity)?;
        self.store.put(T::KIND, entity.id(), body).await
    }

    pub async fn delete(&self, id: u64) -> StoreResult<()> {
        self.store.delete(T::KIND, id).await
    }
}

fn decode<T: Entity>(id: u64, body: Value) -> StoreResult<T> {
    serde_json::from_value(body).map_err(|source| StoreError::Malformed {
        kind: T::KIND,
        id,
        source,
    })
}

fn decode_body<T: Entity>(body: Value) -> StoreResult<T> {
    let id = body.get("id").and_then(Value::as_u64).unwrap_or_default();
    decode(id, body)
}
