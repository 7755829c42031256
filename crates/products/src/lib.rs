//! Catalog domain module: products, components and what they contain.
//!
//! This crate contains the catalog's business rules, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage). Stores and the
//! association manager live in `catalog-infra`.

pub mod association;
pub mod item;
pub mod pagination;

pub use association::{NewProductComponent, ProductComponent, Quantity};
pub use item::{
    Component, ComponentKind, Item, ItemKind, ItemPatch, NewItem, Product, ProductKind,
};
pub use pagination::{DEFAULT_PAGE_SIZE, Page, PageRequest};
