//! `catalog-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy and the stateless formatting helpers shared
//! by every layer.

pub mod entity;
pub mod error;
pub mod format;
pub mod id;
pub mod value_object;

pub use entity::{Audited, Entity};
pub use error::{DomainError, DomainResult};
pub use id::{ComponentId, ItemType, ProductComponentId, ProductId};
pub use value_object::ValueObject;
