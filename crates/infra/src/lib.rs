//! Infrastructure layer: stores, catalog services and database wiring.
//!
//! - [`item_store`] / [`association_store`]: persistence boundaries, each with
//!   an in-memory and a PostgreSQL implementation.
//! - [`item_service`]: CRUD rules per item kind.
//! - [`association_manager`]: product/component association rules.
//! - [`db`]: pool creation and migrations.

pub mod association_manager;
pub mod association_store;
pub mod db;
pub mod error;
pub mod item_service;
pub mod item_store;


pub use association_manager::{AssociationManager, ProductComponents};
pub use error::StoreError;
pub use item_service::ItemService;
