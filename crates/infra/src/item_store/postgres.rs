//! Postgres-backed item store.
//!
//! Products and components share one implementation; the table is chosen by
//! the item kind (`products` / `components`, see `migrations/`).
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` |
//! | Database (other) | Any other | `Backend` |
//! | PoolClosed / Io / Other | N/A | `Backend` |

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use catalog_core::{Audited, Entity, ItemType};
use catalog_products::{Item, ItemKind, NewItem, Page, PageRequest};

use super::r#trait::ItemStore;
use crate::error::StoreError;

fn table_for(kind: ItemType) -> &'static str {
    match kind {
        ItemType::Product => "products",
        ItemType::Component => "components",
    }
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl ItemRow {
    fn into_item<K: ItemKind>(self) -> Item<K> {
        Item::from_parts(
            <K::Id as From<i64>>::from(self.id),
            self.name,
            self.description,
            self.created_at,
            self.modified_at,
        )
    }
}

/// Postgres-backed store for one item kind.
///
/// Uses the SQLx connection pool, which is `Send + Sync` and cheap to clone.
#[derive(Debug, Clone)]
pub struct PostgresItemStore<K: ItemKind> {
    pool: PgPool,
    table: &'static str,
    _kind: PhantomData<K>,
}

impl<K: ItemKind> PostgresItemStore<K> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            table: table_for(K::TYPE),
            _kind: PhantomData,
        }
    }
}

#[async_trait]
impl<K: ItemKind> ItemStore<K> for PostgresItemStore<K> {
    #[instrument(skip(self), fields(kind = %K::TYPE), err)]
    async fn find_by_id(&self, id: K::Id) -> Result<Option<Item<K>>, StoreError> {
        let sql = format!(
            "SELECT id, name, description, created_at, modified_at FROM {} WHERE id = $1",
            self.table
        );
        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(Into::<i64>::into(id))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(ItemRow::into_item))
    }

    #[instrument(skip(self), fields(kind = %K::TYPE), err)]
    async fn find_all(&self, request: PageRequest) -> Result<Page<Item<K>>, StoreError> {
        let sql = format!(
            r#"
            SELECT id, name, description, created_at, modified_at
            FROM {}
            ORDER BY id ASC
            LIMIT $1 OFFSET $2
            "#,
            self.table
        );
        let offset = i64::try_from(request.offset())
            .map_err(|_| StoreError::backend("page offset out of range"))?;

        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(i64::from(request.size()))
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let total: i64 = sqlx::query_scalar(&count_sql)
            .fetch_one(&self.pool)
            .await?;

        let items = rows.into_iter().map(ItemRow::into_item).collect();
        Ok(Page::new(items, request, total.max(0) as u64))
    }

    #[instrument(skip(self, new), fields(kind = %K::TYPE), err)]
    async fn insert(&self, new: NewItem, now: DateTime<Utc>) -> Result<Item<K>, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {} (name, description, created_at, modified_at)
            VALUES ($1, $2, $3, $3)
            RETURNING id, name, description, created_at, modified_at
            "#,
            self.table
        );
        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(&new.name)
            .bind(&new.description)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into_item())
    }

    #[instrument(skip(self, item), fields(kind = %K::TYPE, id = %item.id()), err)]
    async fn update(&self, item: &Item<K>) -> Result<bool, StoreError> {
        let sql = format!(
            "UPDATE {} SET name = $1, description = $2, modified_at = $3 WHERE id = $4",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(item.name())
            .bind(item.description())
            .bind(item.modified_at())
            .bind(Into::<i64>::into(item.id()))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(kind = %K::TYPE), err)]
    async fn delete_by_id(&self, id: K::Id) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);
        let result = sqlx::query(&sql)
            .bind(Into::<i64>::into(id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
