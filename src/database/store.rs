use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors from a document store backend
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: Kind, id: u64 },

    #[error("Stored document for {kind} {id} is malformed: {source}")]
    Malformed {
        kind: Kind,
        id: u64,
        #[source]
        source: serde_json::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The three document kinds held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Vessels,
    CargoItems,
    Users,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Vessels => "vessels",
            Kind::CargoItems => "cargo_items",
            Kind::Users => "users",
        }
    }

    /// Singular name used in messages
    pub fn noun(&self) -> &'static str {
        match self {
            Kind::Vessels => "vessel",
            Kind::CargoItems => "cargo item",
            Kind::Users => "user",
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Equality filter on a top-level document field
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

impl Filter {
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, body: &Value) -> bool {
        body.get(&self.field) == Some(&self.value)
    }
}

/// A paged query over one kind. Results are ordered by id.
#[derive(Debug, Clone)]
pub struct Query {
    pub kind: Kind,
    pub filter: Option<Filter>,
    pub limit: u64,
    pub offset: u64,
}

impl Query {
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            filter: None,
            limit: u64::MAX,
            offset: 0,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn page(mut self, limit: u64, offset: u64) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }
}

/// One page of query results; `more` is set when the store holds further
/// matches past this page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub more: bool,
}

impl<T> Page<T> {
    pub fn try_map<U, E>(self, f: impl FnMut(T) -> Result<U, E>) -> Result<Page<U>, E> {
        Ok(Page {
            items: self.items.into_iter().map(f).collect::<Result<_, _>>()?,
            more: self.more,
        })
    }
}

/// Keyed document storage. Bodies are JSON objects; ids are generated by
/// the store and never reused.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn allocate_id(&self, kind: Kind) -> StoreResult<u64>;

    /// Insert or overwrite the document at (kind, id)
    async fn put(&self, kind: Kind, id: u64, body: Value) -> StoreResult<()>;

    async fn get(&self, kind: Kind, id: u64) -> StoreResult<Option<Value>>;

    /// Deleting an absent document is not an error
    async fn delete(&self, kind: Kind, id: u64) -> StoreResult<()>;

    async fn query(&self, query: Query) -> StoreResult<Page<Value>>;

    async fn health_check(&self) -> StoreResult<()>;
}
