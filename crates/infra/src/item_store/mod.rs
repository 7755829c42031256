//! Item store boundary: CRUD + paginated listing, one store per item kind.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryItemStore;
pub use postgres::PostgresItemStore;
pub use r#trait::{DynItemStore, ItemStore};
