use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_products::{Item, ItemKind, NewItem, Page, PageRequest};

use crate::error::StoreError;

/// Persistence for one kind of catalog item.
///
/// The store is a dumb repository: it assigns surrogate ids and persists what
/// it is given. Validation (blank names, deletion guards) lives in
/// `ItemService`.
///
/// Listing is ordered by id so pages are stable between calls.
#[async_trait]
pub trait ItemStore<K: ItemKind>: Send + Sync {
    async fn find_by_id(&self, id: K::Id) -> Result<Option<Item<K>>, StoreError>;

    async fn find_all(&self, request: PageRequest) -> Result<Page<Item<K>>, StoreError>;

    /// Persist a new item, assigning its id; `now` becomes both timestamps.
    async fn insert(&self, new: NewItem, now: DateTime<Utc>) -> Result<Item<K>, StoreError>;

    /// Write back the mutable fields (name, description, modified timestamp)
    /// of an existing item. Returns `false` if the item no longer exists.
    async fn update(&self, item: &Item<K>) -> Result<bool, StoreError>;

    /// Delete by id. Returns whether a record was removed.
    async fn delete_by_id(&self, id: K::Id) -> Result<bool, StoreError>;
}

/// Type-erased store, as wired by the API layer.
pub type DynItemStore<K> = Arc<dyn ItemStore<K>>;

#[async_trait]
impl<K, S> ItemStore<K> for Arc<S>
where
    K: ItemKind,
    S: ItemStore<K> + ?Sized,
{
    async fn find_by_id(&self, id: K::Id) -> Result<Option<Item<K>>, StoreError> {
        (**self).find_by_id(id).await
    }

    async fn find_all(&self, request: PageRequest) -> Result<Page<Item<K>>, StoreError> {
        (**self).find_all(request).await
    }

    async fn insert(&self, new: NewItem, now: DateTime<Utc>) -> Result<Item<K>, StoreError> {
        (**self).insert(new, now).await
    }

    async fn update(&self, item: &Item<K>) -> Result<bool, StoreError> {
        (**self).update(item).await
    }

    async fn delete_by_id(&self, id: K::Id) -> Result<bool, StoreError> {
        (**self).delete_by_id(id).await
    }
}
