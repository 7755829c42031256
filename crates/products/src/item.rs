use core::marker::PhantomData;

use chrono::{DateTime, Utc};

use catalog_core::{Audited, ComponentId, DomainError, DomainResult, Entity, ItemType, ProductId};

/// Type-level tag for the two item kinds.
///
/// Products and components are structurally identical; the kind marker keeps
/// their identity spaces apart (`Item<ProductKind>` only ever carries a
/// `ProductId`) while letting stores and services be written once.
pub trait ItemKind:
    core::fmt::Debug + Copy + Clone + PartialEq + Eq + Send + Sync + 'static
{
    type Id: Copy
        + Eq
        + Ord
        + core::hash::Hash
        + core::fmt::Debug
        + core::fmt::Display
        + From<i64>
        + Into<i64>
        + Send
        + Sync
        + 'static;

    const TYPE: ItemType;

    /// The `NotFound` error for an id of this kind.
    fn not_found(id: Self::Id) -> DomainError {
        DomainError::NotFound {
            kind: Self::TYPE,
            id: id.into(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ProductKind;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct ComponentKind;

impl ItemKind for ProductKind {
    type Id = ProductId;
    const TYPE: ItemType = ItemType::Product;
}

impl ItemKind for ComponentKind {
    type Id = ComponentId;
    const TYPE: ItemType = ItemType::Component;
}

pub type Product = Item<ProductKind>;
pub type Component = Item<ComponentKind>;

/// A catalog item (product or component).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<K: ItemKind> {
    id: K::Id,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    _kind: PhantomData<K>,
}

impl<K: ItemKind> Item<K> {
    /// Build a freshly created item; both timestamps are `now`.
    pub fn create(id: K::Id, new: NewItem, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            description: new.description,
            created_at: now,
            modified_at: now,
            _kind: PhantomData,
        }
    }

    /// Rehydrate an item from storage.
    pub fn from_parts(
        id: K::Id,
        name: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            created_at,
            modified_at,
            _kind: PhantomData,
        }
    }

    pub fn kind(&self) -> ItemType {
        K::TYPE
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Apply a validated patch. Only fields whose value actually differs are
    /// written; `modified_at` moves to `now` only when something changed.
    ///
    /// Returns whether the item changed.
    pub fn apply_patch(&mut self, patch: &ItemPatch, now: DateTime<Utc>) -> bool {
        let mut changed = false;

        if let Some(name) = &patch.name {
            if *name != self.name {
                self.name = name.clone();
                changed = true;
            }
        }

        if let Some(description) = &patch.description {
            if self.description.as_deref() != Some(description.as_str()) {
                self.description = Some(description.clone());
                changed = true;
            }
        }

        if changed {
            self.modified_at = now;
        }
        changed
    }
}

impl<K: ItemKind> Entity for Item<K> {
    type Id = K::Id;

    fn id(&self) -> Self::Id {
        self.id
    }
}

impl<K: ItemKind> Audited for Item<K> {
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }
}

/// Input for creating an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
}

impl NewItem {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }

    /// Reject a missing or blank name.
    pub fn validate(&self, kind: ItemType) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::bad_request(format!("{kind} name is required")));
        }
        Ok(())
    }
}

/// Partial update of an item's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ItemPatch {
    pub fn validate(&self, kind: ItemType) -> DomainResult<()> {
        if self.name.is_none() && self.description.is_none() {
            return Err(DomainError::bad_request(format!(
                "New value for the {} name or description must be provided",
                kind.lowercase()
            )));
        }

        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(DomainError::bad_request(format!("{kind} name cannot be blank")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn product(id: i64) -> Product {
        Item::create(
            ProductId::new(id),
            NewItem::new("Bike", Some("Road bike".to_string())),
            Utc::now(),
        )
    }

    #[test]
    fn create_sets_both_timestamps() {
        let p = product(1);
        assert_eq!(p.created_at(), p.modified_at());
        assert_eq!(p.id(), ProductId::new(1));
        assert_eq!(p.kind(), ItemType::Product);
    }

    #[test]
    fn new_item_rejects_blank_name() {
        let err = NewItem::new("   ", None).validate(ItemType::Component).unwrap_err();
        assert_eq!(err, DomainError::bad_request("Component name is required"));
    }

    #[test]
    fn empty_patch_is_rejected() {
        let err = ItemPatch::default().validate(ItemType::Product).unwrap_err();
        assert_eq!(
            err.to_string(),
            "New value for the product name or description must be provided"
        );
    }

    #[test]
    fn blank_name_patch_is_rejected() {
        let patch = ItemPatch {
            name: Some(" ".to_string()),
            description: None,
        };
        let err = patch.validate(ItemType::Component).unwrap_err();
        assert_eq!(err.to_string(), "Component name cannot be blank");
    }

    #[test]
    fn apply_patch_only_touches_changed_fields() {
        let mut p = product(1);
        let later = p.modified_at() + Duration::seconds(5);

        let same = ItemPatch {
            name: Some("Bike".to_string()),
            description: None,
        };
        assert!(!p.apply_patch(&same, later));
        assert_eq!(p.modified_at(), p.created_at());

        let rename = ItemPatch {
            name: Some("Gravel bike".to_string()),
            description: None,
        };
        assert!(p.apply_patch(&rename, later));
        assert_eq!(p.name(), "Gravel bike");
        assert_eq!(p.description(), Some("Road bike"));
        assert_eq!(p.modified_at(), later);
    }

    #[test]
    fn not_found_carries_the_kind() {
        let err = ComponentKind::not_found(ComponentId::new(5));
        assert_eq!(err.to_string(), "Component '5' was not found");
    }
}
