use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use catalog_core::Entity;
use catalog_products::{Item, ItemKind, NewItem, Page, PageRequest};

use super::r#trait::ItemStore;
use crate::error::StoreError;

#[derive(Debug)]
struct Inner<K: ItemKind> {
    next_id: i64,
    items: BTreeMap<K::Id, Item<K>>,
}

/// In-memory item store.
///
/// Intended for tests/dev. Ids start at 1 and are never reused, like a
/// database sequence.
#[derive(Debug)]
pub struct InMemoryItemStore<K: ItemKind> {
    inner: RwLock<Inner<K>>,
}

impl<K: ItemKind> InMemoryItemStore<K> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                items: BTreeMap::new(),
            }),
        }
    }

    /// Number of stored items (test helper).
    pub fn len(&self) -> usize {
        self.inner.read().map(|i| i.items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K: ItemKind> Default for InMemoryItemStore<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<K: ItemKind> ItemStore<K> for InMemoryItemStore<K> {
    async fn find_by_id(&self, id: K::Id) -> Result<Option<Item<K>>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::poisoned())?;
        Ok(inner.items.get(&id).cloned())
    }

    async fn find_all(&self, request: PageRequest) -> Result<Page<Item<K>>, StoreError> {
        let inner = self.inner.read().map_err(|_| StoreError::poisoned())?;
        let all = inner.items.values().cloned().collect::<Vec<_>>();
        Ok(Page::paginate(all, request))
    }

    async fn insert(&self, new: NewItem, now: DateTime<Utc>) -> Result<Item<K>, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;
        let id = <K::Id as From<i64>>::from(inner.next_id);
        inner.next_id += 1;

        let item = Item::create(id, new, now);
        inner.items.insert(id, item.clone());
        Ok(item)
    }

    async fn update(&self, item: &Item<K>) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;
        match inner.items.get_mut(&item.id()) {
            Some(slot) => {
                *slot = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: K::Id) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().map_err(|_| StoreError::poisoned())?;
        Ok(inner.items.remove(&id).is_some())
    }
}
