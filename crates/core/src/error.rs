//! Domain error model.

use thiserror::Error;

use crate::format;
use crate::id::{ComponentId, ItemType, ProductId};

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// missing references, conflicts). The HTTP layer maps each variant to a status
/// code; nothing here knows about HTTP.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A referenced product or component does not exist.
    #[error("{}", format::item_not_found(*kind, *id))]
    NotFound { kind: ItemType, id: i64 },

    /// The product exists but does not contain the component.
    #[error("{}", format::association_missing(*product_id, *component_id))]
    AssociationNotFound {
        product_id: ProductId,
        component_id: ComponentId,
    },

    /// The requested state transition clashes with existing state
    /// (duplicate association, deleting an item that is still referenced).
    #[error("{0}")]
    Conflict(String),

    /// The input failed validation.
    #[error("{0}")]
    BadRequest(String),

    /// The backing store failed; the message is for logs, not for clients.
    #[error("store failure: {0}")]
    Store(String),
}

impl DomainError {
    pub fn product_not_found(id: ProductId) -> Self {
        Self::NotFound {
            kind: ItemType::Product,
            id: id.get(),
        }
    }

    pub fn component_not_found(id: ComponentId) -> Self {
        Self::NotFound {
            kind: ItemType::Component,
            id: id.get(),
        }
    }

    pub fn association_not_found(product_id: ProductId, component_id: ComponentId) -> Self {
        Self::AssociationNotFound {
            product_id,
            component_id,
        }
    }

    /// The (product, component) pair is already associated.
    pub fn already_contains(product_id: ProductId, component_id: ComponentId) -> Self {
        Self::Conflict(format::association_exists(product_id, component_id))
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// True for the two "missing" variants.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::AssociationNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_kind_and_id() {
        let err = DomainError::product_not_found(ProductId::new(999));
        assert_eq!(err.to_string(), "Product '999' was not found");

        let err = DomainError::component_not_found(ComponentId::new(2));
        assert_eq!(err.to_string(), "Component '2' was not found");
    }

    #[test]
    fn association_messages() {
        let missing = DomainError::association_not_found(ProductId::new(1), ComponentId::new(2));
        assert_eq!(missing.to_string(), "Product '1' does not contain Component '2'");
        assert!(missing.is_not_found());

        let dup = DomainError::already_contains(ProductId::new(1), ComponentId::new(2));
        assert_eq!(dup.to_string(), "Product '1' already contains Component '2'");
        assert!(!dup.is_not_found());
    }
}
