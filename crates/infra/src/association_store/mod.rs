//! Association store boundary: (product, component, quantity) rows keyed by a
//! surrogate id.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryAssociationStore;
pub use postgres::PostgresAssociationStore;
pub use r#trait::{AssociationStore, DynAssociationStore};
