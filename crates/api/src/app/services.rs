//! Service wiring: picks the store backend and builds the catalog services on
//! top of it.

use std::sync::Arc;

use tracing::info;

use catalog_infra::association_store::{
    DynAssociationStore, InMemoryAssociationStore, PostgresAssociationStore,
};
use catalog_infra::db;
use catalog_infra::item_store::{DynItemStore, InMemoryItemStore, PostgresItemStore};
use catalog_infra::{AssociationManager, ItemService, StoreError};
use catalog_products::{ComponentKind, ProductKind};

use crate::config::{ApiConfig, StoreBackend};

/// Everything the handlers need, shared behind an `Arc`.
#[derive(Clone)]
pub struct AppServices {
    pub products: ItemService<ProductKind>,
    pub components: ItemService<ComponentKind>,
    pub associations: AssociationManager,
}

impl AppServices {
    pub fn new(
        product_store: DynItemStore<ProductKind>,
        component_store: DynItemStore<ComponentKind>,
        association_store: DynAssociationStore,
        default_page_size: u32,
    ) -> Self {
        Self {
            products: ItemService::new(product_store.clone(), association_store.clone())
                .with_default_page_size(default_page_size),
            components: ItemService::new(component_store.clone(), association_store.clone())
                .with_default_page_size(default_page_size),
            associations: AssociationManager::new(
                product_store,
                component_store,
                association_store,
            ),
        }
    }
}

pub async fn build_services(config: &ApiConfig) -> Result<AppServices, StoreError> {
    match &config.store {
        StoreBackend::InMemory => Ok(build_in_memory_services(config.default_page_size)),
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            build_persistent_services(database_url, *max_connections, config.default_page_size)
                .await
        }
    }
}

pub fn build_in_memory_services(default_page_size: u32) -> AppServices {
    info!("using in-memory stores");
    AppServices::new(
        Arc::new(InMemoryItemStore::<ProductKind>::new()),
        Arc::new(InMemoryItemStore::<ComponentKind>::new()),
        Arc::new(InMemoryAssociationStore::new()),
        default_page_size,
    )
}

async fn build_persistent_services(
    database_url: &str,
    max_connections: u32,
    default_page_size: u32,
) -> Result<AppServices, StoreError> {
    info!("using postgres stores");
    let pool = db::connect(database_url, max_connections).await?;

    Ok(AppServices::new(
        Arc::new(PostgresItemStore::<ProductKind>::new(pool.clone())),
        Arc::new(PostgresItemStore::<ComponentKind>::new(pool.clone())),
        Arc::new(PostgresAssociationStore::new(pool)),
        default_page_size,
    ))
}
