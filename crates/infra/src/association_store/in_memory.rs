use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use catalog_core::{ComponentId, Entity, ProductComponentId, ProductId};
use catalog_products::{NewProductComponent, ProductComponent};

use super::r#trait::AssociationStore;
use crate::error::StoreError;

const PAIR_CONSTRAINT: &str = "uq_product_components_pair";

#[derive(Debug)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<ProductComponentId, ProductComponent>,
}

/// In-memory association store for tests/dev.
#[derive(Debug)]
pub struct InMemoryAssociationStore {
    inner: RwLock<Inner>,
}

impl InMemoryAssociationStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored rows (test helper).
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn select<F>(&self, filter: F) -> Result<Vec<ProductComponent>, StoreError>
    where
        F: Fn(&ProductComponent) -> bool,
    {
        let inner = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(inner.rows.values().filter(|r| filter(r)).cloned().collect())
    }
}

impl Default for InMemoryAssociationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssociationStore for InMemoryAssociationStore {
    async fn find(
        &self,
        product_id: ProductId,
        component_id: ComponentId,
    ) -> Result<Option<ProductComponent>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(inner
            .rows
            .values()
            .find(|r| r.key() == (product_id, component_id))
            .cloned())
    }

    async fn list_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductComponent>, StoreError> {
        let mut rows = self.select(|r| r.product_id == product_id)?;
        rows.sort_by_key(|r| r.component_id);
        Ok(rows)
    }

    async fn list_by_component(
        &self,
        component_id: ComponentId,
    ) -> Result<Vec<ProductComponent>, StoreError> {
        let mut rows = self.select(|r| r.component_id == component_id)?;
        rows.sort_by_key(|r| r.product_id);
        Ok(rows)
    }

    async fn count_by_component(&self, component_id: ComponentId) -> Result<u64, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(inner
            .rows
            .values()
            .filter(|r| r.component_id == component_id)
            .count() as u64)
    }

    async fn count_by_product(&self, product_id: ProductId) -> Result<u64, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(inner
            .rows
            .values()
            .filter(|r| r.product_id == product_id)
            .count() as u64)
    }

    async fn insert(&self, new: NewProductComponent) -> Result<ProductComponent, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;

        let duplicate = inner
            .rows
            .values()
            .any(|r| r.key() == (new.product_id, new.component_id));
        if duplicate {
            return Err(StoreError::UniqueViolation(PAIR_CONSTRAINT.to_string()));
        }

        let id = ProductComponentId::new(inner.next_id);
        inner.next_id += 1;

        let row = new.with_id(id);
        inner.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn update(&self, association: &ProductComponent) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;
        match inner.rows.get_mut(&association.id()) {
            Some(row) => {
                row.set_quantity(association.quantity());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: ProductComponentId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;
        Ok(inner.rows.remove(&id).is_some())
    }
}
