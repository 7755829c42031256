//! CRUD routes shared by `/product` and `/component`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Path, Query},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use catalog_core::Entity;
use catalog_infra::item_service::Referenced;
use catalog_infra::ItemService;
use catalog_products::{ComponentKind, ItemKind, ProductKind};

use crate::app::dto::{ItemRequest, ItemResponse, ListQuery, ListResponse};
use crate::app::errors::{ApiError, ApiResult};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

/// An item kind with its own service in [`AppServices`].
pub trait CatalogItem: Referenced {
    fn service(services: &AppServices) -> &ItemService<Self>;
}

impl CatalogItem for ProductKind {
    fn service(services: &AppServices) -> &ItemService<Self> {
        &services.products
    }
}

impl CatalogItem for ComponentKind {
    fn service(services: &AppServices) -> &ItemService<Self> {
        &services.components
    }
}

pub fn router<K: CatalogItem>() -> Router {
    Router::new()
        .route("/", get(list_items::<K>).post(create_item::<K>))
        .route(
            "/:id",
            get(get_item::<K>)
                .patch(edit_item::<K>)
                .delete(delete_item::<K>),
        )
}

fn item_id<K: ItemKind>(raw: &str) -> ApiResult<K::Id> {
    parse_id(raw, K::TYPE).map(<K::Id as From<i64>>::from)
}

pub async fn list_items<K: CatalogItem>(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<ListResponse<ItemResponse>>> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let service = K::service(&services);

    let request = service.page_request(query.page()?, query.size()?)?;
    let page = service.list(request).await?;
    Ok(Json(ListResponse::from_page(page, |item| ItemResponse::from(item))))
}

pub async fn get_item<K: CatalogItem>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Json<ItemResponse>> {
    let id = item_id::<K>(&id)?;
    let item = K::service(&services).get(id).await?;
    Ok(Json(ItemResponse::from(&item)))
}

/// Responds `201` with the new id as the body.
pub async fn create_item<K: CatalogItem>(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<i64>)> {
    let Json(body) = body?;
    let item = K::service(&services).create(body.into_new_item()).await?;
    Ok((StatusCode::CREATED, Json(item.id().into())))
}

pub async fn edit_item<K: CatalogItem>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ItemRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let id = item_id::<K>(&id)?;
    let Json(body) = body?;
    K::service(&services).edit(id, body.into_patch()).await?;
    Ok(StatusCode::OK)
}

/// `200` whether or not the item existed.
pub async fn delete_item<K: CatalogItem>(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = item_id::<K>(&id)?;
    K::service(&services).delete(id).await?;
    Ok(StatusCode::OK)
}
