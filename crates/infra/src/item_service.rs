//! CRUD rules shared by products and components.
//!
//! One [`ItemService`] per item kind. Validation (blank names, empty edits)
//! and the deletion guards live here; the stores only persist.

use std::marker::PhantomData;

use chrono::Utc;
use tracing::info;

use catalog_core::format;
use catalog_core::{ComponentId, DomainError, DomainResult, Entity, ProductId};
use catalog_products::{
    ComponentKind, DEFAULT_PAGE_SIZE, Item, ItemKind, ItemPatch, NewItem, Page, PageRequest,
    ProductKind,
};

use crate::association_store::{AssociationStore, DynAssociationStore};
use crate::item_store::{DynItemStore, ItemStore};

/// Which side of an association an item id sits on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AssociationSide {
    Product(ProductId),
    Component(ComponentId),
}

/// Item kinds that can be referenced by association rows.
pub trait Referenced: ItemKind {
    fn side(id: Self::Id) -> AssociationSide;
}

impl Referenced for ProductKind {
    fn side(id: ProductId) -> AssociationSide {
        AssociationSide::Product(id)
    }
}

impl Referenced for ComponentKind {
    fn side(id: ComponentId) -> AssociationSide {
        AssociationSide::Component(id)
    }
}

#[derive(Debug, Clone)]
pub struct ItemService<K: ItemKind, S = DynItemStore<K>, A = DynAssociationStore> {
    store: S,
    associations: A,
    default_page_size: u32,
    _kind: PhantomData<K>,
}

impl<K: ItemKind, S, A> ItemService<K, S, A> {
    pub fn new(store: S, associations: A) -> Self {
        Self {
            store,
            associations,
            default_page_size: DEFAULT_PAGE_SIZE,
            _kind: PhantomData,
        }
    }

    pub fn with_default_page_size(mut self, size: u32) -> Self {
        self.default_page_size = size.max(1);
        self
    }

    /// Build a page request from optional query parameters.
    pub fn page_request(&self, page: Option<i64>, size: Option<i64>) -> DomainResult<PageRequest> {
        PageRequest::new(
            page.unwrap_or(0),
            size.unwrap_or(i64::from(self.default_page_size)),
        )
    }
}

impl<K, S, A> ItemService<K, S, A>
where
    K: Referenced,
    S: ItemStore<K>,
    A: AssociationStore,
{
    pub async fn list(&self, request: PageRequest) -> DomainResult<Page<Item<K>>> {
        Ok(self.store.find_all(request).await?)
    }

    pub async fn get(&self, id: K::Id) -> DomainResult<Item<K>> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| K::not_found(id))
    }

    pub async fn create(&self, new: NewItem) -> DomainResult<Item<K>> {
        new.validate(K::TYPE)?;
        let item = self.store.insert(new, Utc::now()).await?;
        info!(kind = %K::TYPE, id = %item.id(), "item created");
        Ok(item)
    }

    /// Apply a partial update. Unchanged fields are not written, and an edit
    /// that changes nothing leaves the modified timestamp alone.
    pub async fn edit(&self, id: K::Id, patch: ItemPatch) -> DomainResult<Item<K>> {
        patch.validate(K::TYPE)?;
        let mut item = self.get(id).await?;

        if item.apply_patch(&patch, Utc::now()) {
            if !self.store.update(&item).await? {
                return Err(K::not_found(id));
            }
            info!(kind = %K::TYPE, %id, "item updated");
        }
        Ok(item)
    }

    /// Delete an item. Deleting a missing item succeeds; deleting one that is
    /// still referenced by an association is a conflict.
    ///
    /// Returns whether a record was removed.
    pub async fn delete(&self, id: K::Id) -> DomainResult<bool> {
        match K::side(id) {
            AssociationSide::Component(component_id) => {
                if self.associations.count_by_component(component_id).await? > 0 {
                    return Err(DomainError::conflict(format::component_in_use(component_id)));
                }
            }
            AssociationSide::Product(product_id) => {
                if self.associations.count_by_product(product_id).await? > 0 {
                    return Err(DomainError::conflict(format::product_has_components(
                        product_id,
                    )));
                }
            }
        }

        let removed = self.store.delete_by_id(id).await?;
        if removed {
            info!(kind = %K::TYPE, %id, "item deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use catalog_core::Audited;
    use catalog_products::{NewProductComponent, Quantity};

    use super::*;
    use crate::association_store::InMemoryAssociationStore;
    use crate::item_store::InMemoryItemStore;

    type Service<K> = ItemService<K, Arc<InMemoryItemStore<K>>, Arc<InMemoryAssociationStore>>;

    fn services() -> (
        Service<ProductKind>,
        Service<ComponentKind>,
        Arc<InMemoryAssociationStore>,
    ) {
        let associations = Arc::new(InMemoryAssociationStore::new());
        (
            ItemService::new(Arc::new(InMemoryItemStore::new()), associations.clone()),
            ItemService::new(Arc::new(InMemoryItemStore::new()), associations.clone()),
            associations,
        )
    }

    #[tokio::test]
    async fn create_validates_and_assigns_ids() {
        let (products, _, _) = services();

        let err = products.create(NewItem::new(" ", None)).await.unwrap_err();
        assert_eq!(err.to_string(), "Product name is required");

        let created = products
            .create(NewItem::new("Bike", Some("Road".to_string())))
            .await
            .unwrap();
        assert_eq!(created.id(), ProductId::new(1));
        assert_eq!(products.get(created.id()).await.unwrap(), created);
    }

    #[tokio::test]
    async fn get_missing_item_names_the_kind() {
        let (_, components, _) = services();
        let err = components.get(ComponentId::new(4)).await.unwrap_err();
        assert_eq!(err.to_string(), "Component '4' was not found");
    }

    #[tokio::test]
    async fn edit_rules() {
        let (_, components, _) = services();
        let created = components.create(NewItem::new("Wheel", None)).await.unwrap();

        let err = components
            .edit(created.id(), ItemPatch::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "New value for the component name or description must be provided"
        );

        let blank = ItemPatch {
            name: Some("".to_string()),
            description: None,
        };
        let err = components.edit(created.id(), blank).await.unwrap_err();
        assert_eq!(err.to_string(), "Component name cannot be blank");

        let rename = ItemPatch {
            name: Some("Tyre".to_string()),
            description: None,
        };
        let err = components
            .edit(ComponentId::new(99), rename.clone())
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        let same = ItemPatch {
            name: Some("Wheel".to_string()),
            description: None,
        };
        let unchanged = components.edit(created.id(), same).await.unwrap();
        assert_eq!(unchanged.modified_at(), created.modified_at());

        let edited = components.edit(created.id(), rename).await.unwrap();
        assert_eq!(edited.name(), "Tyre");
        assert_eq!(components.get(created.id()).await.unwrap().name(), "Tyre");
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let (products, _, _) = services();
        let created = products.create(NewItem::new("Bike", None)).await.unwrap();
        assert!(products.delete(created.id()).await.unwrap());
        assert!(!products.delete(created.id()).await.unwrap());
    }

    #[tokio::test]
    async fn referenced_items_cannot_be_deleted() {
        let (products, components, associations) = services();
        let product = products.create(NewItem::new("Bike", None)).await.unwrap();
        let component = components.create(NewItem::new("Wheel", None)).await.unwrap();
        let row = associations
            .insert(NewProductComponent {
                product_id: product.id(),
                component_id: component.id(),
                quantity: Quantity::ONE,
            })
            .await
            .unwrap();

        let err = components.delete(component.id()).await.unwrap_err();
        assert_eq!(err, DomainError::conflict("Component '1' is used in some product(s)"));

        let err = products.delete(product.id()).await.unwrap_err();
        assert_eq!(err, DomainError::conflict("Product '1' still contains some component(s)"));

        associations.delete(row.id()).await.unwrap();
        assert!(components.delete(component.id()).await.unwrap());
        assert!(products.delete(product.id()).await.unwrap());
    }

    #[tokio::test]
    async fn page_request_uses_the_configured_default() {
        let (products, _, _) = services();
        let products = products.with_default_page_size(3);
        for name in ["A", "B", "C", "D"] {
            products.create(NewItem::new(name, None)).await.unwrap();
        }

        let request = products.page_request(None, None).unwrap();
        assert_eq!(request.size(), 3);
        let page = products.list(request).await.unwrap();
        assert_eq!(page.count(), 3);
        assert_eq!(page.total, 4);

        let err = products.page_request(Some(-1), None).unwrap_err();
        assert_eq!(err.to_string(), "Page must not be negative");
    }
}
