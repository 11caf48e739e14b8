use async_trait::async_trait;
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};
use tracing::info;

use super::store::{DocumentStore, Kind, Page, Query, StoreResult};

const SCHEMA_SQL: [&str; 2] = [
    "CREATE SEQUENCE IF NOT EXISTS entity_ids",
    r#"
    CREATE TABLE IF NOT EXISTS entities (
        kind TEXT NOT NULL,
        id BIGINT NOT NULL,
        body JSONB NOT NULL,
        PRIMARY KEY (kind, id)
    )
    "#,
];

/// Document store backed by a single PostgreSQL JSONB table
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub async fn connect(database_url: &str, max_connections: u32) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        info!("Connected document store to {}", redact(database_url));
        Ok(Self { pool })
    }

    /// Create the entity table and id sequence if they do not exist
    pub async fn migrate(&self) -> StoreResult<()> {
        for statement in SCHEMA_SQL {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

fn to_db_id(id: u64) -> i64 {
    i64::try_from(id).unwrap_or(i64::MAX)
}

/// Hide the password portion of a connection string for logging
fn redact(database_url: &str) -> String {
    match url::Url::parse(database_url) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.into()
        }
        Err(_) => "<invalid database url>".to_string(),
    }
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn allocate_id(&self, _kind: Kind) -> StoreResult<u64> {
        let id: i64 = sqlx::query_scalar("SELECT nextval('entity_ids')")
            .fetch_one(&self.pool)
            .await?;
        Ok(id as u64)
    }

    async fn put(&self, kind: Kind, id: u64, body: Value) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO entities (kind, id, body) VALUES ($1, $2, $3) \
             ON CONFLICT (kind, id) DO UPDATE SET body = EXCLUDED.body",
        )
        .bind(kind.as_str())
        .bind(to_db_id(id))
        .bind(Json(body))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, kind: Kind, id: u64) -> StoreResult<Option<Value>> {
        let body: Option<Json<Value>> =
            sqlx::query_scalar("SELECT body FROM entities WHERE kind = $1 AND id = $2")
                .bind(kind.as_str())
                .bind(to_db_id(id))
                .fetch_optional(&self.pool)
                .await?;
        Ok(body.map(|Json(v)| v))
    }

    async fn delete(&self, kind: Kind, id: u64) -> StoreResult<()> {
        sqlx::query("DELETE FROM entities WHERE kind = $1 AND id = $2")
            .bind(kind.as_str())
            .bind(to_db_id(id))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn query(&self, query: Query) -> StoreResult<Page<Value>> {
        // Fetch one extra row to learn whether another page exists
        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX - 1);
        let fetch = limit.saturating_add(1);
        let offset = to_db_id(query.offset);

        let rows: Vec<Json<Value>> = match &query.filter {
            Some(filter) => {
                sqlx::query_scalar(
                    "SELECT body FROM entities WHERE kind = $1 AND body -> $2 = $3 \
                     ORDER BY id LIMIT $4 OFFSET $5",
                )
                .bind(query.kind.as_str())
                .bind(&filter.field)
                .bind(Json(&filter.value))
                .bind(fetch)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_scalar(
                    "SELECT body FROM entities WHERE kind = $1 ORDER BY id LIMIT $2 OFFSET $3",
                )
                .bind(query.kind.as_str())
                .bind(fetch)
                .bind(offset)
                .fetch_all(&self.pool)
                .await?
            }
        };

        let mut items: Vec<Value> = rows.into_iter().map(|Json(v)| v).collect();
        let more = items.len() as i64 > limit;
        items.truncate(usize::try_from(limit).unwrap_or(usize::MAX));

        Ok(Page { items, more })
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
