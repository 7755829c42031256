//! Postgres-backed association store over the `product_components` table.
//!
//! The `uq_product_components_pair` unique constraint closes the race between
//! the manager's lookup and its insert; a violation surfaces as
//! [`StoreError::UniqueViolation`].

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

use catalog_core::{ComponentId, Entity, ProductComponentId, ProductId};
use catalog_products::{NewProductComponent, ProductComponent, Quantity};

use super::r#trait::AssociationStore;
use crate::error::StoreError;

#[derive(Debug, FromRow)]
struct AssociationRow {
    id: i64,
    product_id: i64,
    component_id: i64,
    quantity: i32,
}

impl TryFrom<AssociationRow> for ProductComponent {
    type Error = StoreError;

    fn try_from(row: AssociationRow) -> Result<Self, Self::Error> {
        let quantity = Quantity::new(i64::from(row.quantity)).map_err(|_| {
            StoreError::backend(format!(
                "association {} has invalid quantity {}",
                row.id, row.quantity
            ))
        })?;
        Ok(ProductComponent::new(
            ProductComponentId::new(row.id),
            ProductId::new(row.product_id),
            ComponentId::new(row.component_id),
            quantity,
        ))
    }
}

fn into_associations(rows: Vec<AssociationRow>) -> Result<Vec<ProductComponent>, StoreError> {
    rows.into_iter().map(ProductComponent::try_from).collect()
}

/// Postgres-backed association store.
#[derive(Debug, Clone)]
pub struct PostgresAssociationStore {
    pool: PgPool,
}

impl PostgresAssociationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssociationStore for PostgresAssociationStore {
    #[instrument(skip(self), err)]
    async fn find(
        &self,
        product_id: ProductId,
        component_id: ComponentId,
    ) -> Result<Option<ProductComponent>, StoreError> {
        let row = sqlx::query_as::<_, AssociationRow>(
            r#"
            SELECT id, product_id, component_id, quantity
            FROM product_components
            WHERE product_id = $1 AND component_id = $2
            "#,
        )
        .bind(product_id.get())
        .bind(component_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(ProductComponent::try_from).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductComponent>, StoreError> {
        let rows = sqlx::query_as::<_, AssociationRow>(
            r#"
            SELECT id, product_id, component_id, quantity
            FROM product_components
            WHERE product_id = $1
            ORDER BY component_id ASC
            "#,
        )
        .bind(product_id.get())
        .fetch_all(&self.pool)
        .await?;

        into_associations(rows)
    }

    #[instrument(skip(self), err)]
    async fn list_by_component(
        &self,
        component_id: ComponentId,
    ) -> Result<Vec<ProductComponent>, StoreError> {
        let rows = sqlx::query_as::<_, AssociationRow>(
            r#"
            SELECT id, product_id, component_id, quantity
            FROM product_components
            WHERE component_id = $1
            ORDER BY product_id ASC
            "#,
        )
        .bind(component_id.get())
        .fetch_all(&self.pool)
        .await?;

        into_associations(rows)
    }

    #[instrument(skip(self), err)]
    async fn count_by_component(&self, component_id: ComponentId) -> Result<u64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_components WHERE component_id = $1")
                .bind(component_id.get())
                .fetch_one(&self.pool)
                .await?;
        Ok(count.max(0) as u64)
    }

    #[instrument(skip(self), err)]
    async fn count_by_product(&self, product_id: ProductId) -> Result<u64, StoreError> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM product_components WHERE product_id = $1")
                .bind(product_id.get())
                .fetch_one(&self.pool)
                .await?;
        Ok(count.max(0) as u64)
    }

    #[instrument(
        skip(self, new),
        fields(product_id = %new.product_id, component_id = %new.component_id),
        err
    )]
    async fn insert(&self, new: NewProductComponent) -> Result<ProductComponent, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO product_components (product_id, component_id, quantity)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(new.product_id.get())
        .bind(new.component_id.get())
        .bind(new.quantity.get())
        .fetch_one(&self.pool)
        .await?;

        Ok(new.with_id(ProductComponentId::new(id)))
    }

    #[instrument(skip(self, association), fields(id = %association.id()), err)]
    async fn update(&self, association: &ProductComponent) -> Result<bool, StoreError> {
        let result = sqlx::query("UPDATE product_components SET quantity = $1 WHERE id = $2")
            .bind(association.quantity().get())
            .bind(association.id().get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), err)]
    async fn delete(&self, id: ProductComponentId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM product_components WHERE id = $1")
            .bind(id.get())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
