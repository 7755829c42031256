use std::sync::Arc;

use async_trait::async_trait;

use catalog_core::{ComponentId, ProductComponentId, ProductId};
use catalog_products::{NewProductComponent, ProductComponent};

use crate::error::StoreError;

/// Persistence for product/component association rows.
///
/// Implementations reject a second row for the same (product, component)
/// pair with [`StoreError::UniqueViolation`]; the association manager checks
/// first, so this only fires when two writers race.
#[async_trait]
pub trait AssociationStore: Send + Sync {
    async fn find(
        &self,
        product_id: ProductId,
        component_id: ComponentId,
    ) -> Result<Option<ProductComponent>, StoreError>;

    /// All rows for a product, ordered by component id.
    async fn list_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductComponent>, StoreError>;

    /// All rows for a component, ordered by product id.
    async fn list_by_component(
        &self,
        component_id: ComponentId,
    ) -> Result<Vec<ProductComponent>, StoreError>;

    async fn count_by_component(&self, component_id: ComponentId) -> Result<u64, StoreError>;

    async fn count_by_product(&self, product_id: ProductId) -> Result<u64, StoreError>;

    async fn insert(&self, new: NewProductComponent) -> Result<ProductComponent, StoreError>;

    /// Persist the quantity of an existing row. Returns `false` if the row is gone.
    async fn update(&self, association: &ProductComponent) -> Result<bool, StoreError>;

    async fn delete(&self, id: ProductComponentId) -> Result<bool, StoreError>;
}

pub type DynAssociationStore = Arc<dyn AssociationStore>;

#[async_trait]
impl<S> AssociationStore for Arc<S>
where
    S: AssociationStore + ?Sized,
{
    async fn find(
        &self,
        product_id: ProductId,
        component_id: ComponentId,
    ) -> Result<Option<ProductComponent>, StoreError> {
        (**self).find(product_id, component_id).await
    }

    async fn list_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductComponent>, StoreError> {
        (**self).list_by_product(product_id).await
    }

    async fn list_by_component(
        &self,
        component_id: ComponentId,
    ) -> Result<Vec<ProductComponent>, StoreError> {
        (**self).list_by_component(component_id).await
    }

    async fn count_by_component(&self, component_id: ComponentId) -> Result<u64, StoreError> {
        (**self).count_by_component(component_id).await
    }

    async fn count_by_product(&self, product_id: ProductId) -> Result<u64, StoreError> {
        (**self).count_by_product(product_id).await
    }

    async fn insert(&self, new: NewProductComponent) -> Result<ProductComponent, StoreError> {
        (**self).insert(new).await
    }

    async fn update(&self, association: &ProductComponent) -> Result<bool, StoreError> {
        (**self).update(association).await
    }

    async fn delete(&self, id: ProductComponentId) -> Result<bool, StoreError> {
        (**self).delete(id).await
    }
}
