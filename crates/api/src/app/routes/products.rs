//! Association routes under `/product/:id/components`.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use catalog_core::{ComponentId, ItemType, ProductId};

use crate::app::dto::{ComponentAddRequest, ComponentQuantityRequest, ProductComponentResponse};
use crate::app::errors::ApiResult;
use crate::app::routes::parse_id;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route(
            "/:id/components",
            get(list_components).post(add_component),
        )
        .route(
            "/:id/components/:component_id",
            patch(update_quantity).delete(remove_component),
        )
}

fn ids(product_id: &str, component_id: &str) -> ApiResult<(ProductId, ComponentId)> {
    let product_id = ProductId::new(parse_id(product_id, ItemType::Product)?);
    let component_id = ComponentId::new(parse_id(component_id, ItemType::Component)?);
    Ok((product_id, component_id))
}

pub async fn list_components(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ProductComponentResponse>>> {
    let product_id = ProductId::new(parse_id(&id, ItemType::Product)?);
    let components = services.associations.components_for_product(product_id).await?;
    Ok(Json(
        components
            .entries()
            .iter()
            .map(ProductComponentResponse::from)
            .collect(),
    ))
}

pub async fn add_component(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ComponentAddRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let product_id = ProductId::new(parse_id(&id, ItemType::Product)?);
    let Json(body) = body?;
    let (component_id, quantity) = body.validate()?;

    services
        .associations
        .add_component_to_product(product_id, ComponentId::new(component_id), quantity)
        .await?;
    Ok(StatusCode::CREATED)
}

pub async fn update_quantity(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, component_id)): Path<(String, String)>,
    body: Result<Json<ComponentQuantityRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let (product_id, component_id) = ids(&id, &component_id)?;
    let Json(body) = body?;
    let quantity = body.validate()?;

    services
        .associations
        .update_component_quantity(product_id, component_id, quantity)
        .await?;
    Ok(StatusCode::OK)
}

pub async fn remove_component(
    Extension(services): Extension<Arc<AppServices>>,
    Path((id, component_id)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let (product_id, component_id) = ids(&id, &component_id)?;
    services
        .associations
        .remove_component_from_product(product_id, component_id)
        .await?;
    Ok(StatusCode::OK)
}
