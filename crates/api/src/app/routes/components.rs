//! `/component/:id/products`: which products use a component.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    routing::get,
    Json, Router,
};

use catalog_core::{ComponentId, ItemType};

use crate::app::dto::{ItemResponse, ListQuery, ListResponse};
use crate::app::errors::{ApiError, ApiResult};
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:id/products", get(list_products))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<ListResponse<ItemResponse>>> {
    let component_id = ComponentId::new(parse_id(&id, ItemType::Component)?);
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let request = services
        .components
        .page_request(query.page()?, query.size()?)?;
    let page = services
        .associations
        .products_by_component(component_id, request)
        .await?;
    Ok(Json(ListResponse::from_page(page, |product| {
        ItemResponse::from(product)
    })))
}
