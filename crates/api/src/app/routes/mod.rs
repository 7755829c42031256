use axum::Router;

use catalog_core::ItemType;
use catalog_products::{ComponentKind, ProductKind};

use crate::app::errors::{ApiError, ApiResult};

pub mod components;
pub mod items;
pub mod products;
pub mod system;

/// Router for everything under `/api/v1`.
pub fn router() -> Router {
    Router::new()
        .nest(
            "/product",
            items::router::<ProductKind>().merge(products::router()),
        )
        .nest(
            "/component",
            items::router::<ComponentKind>().merge(components::router()),
        )
}

/// Parse a path id of the given kind: a number, and at least one.
pub(crate) fn parse_id(raw: &str, kind: ItemType) -> ApiResult<i64> {
    let id: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("'{}Id' must be a number", kind.lowercase())))?;
    if id < 1 {
        return Err(ApiError::bad_request(format!(
            "{kind} ID must be greater than zero"
        )));
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_ids_must_be_positive_numbers() {
        assert_eq!(parse_id("12", ItemType::Product).unwrap(), 12);

        let err = parse_id("abc", ItemType::Component).unwrap_err();
        assert_eq!(err.to_string(), "'componentId' must be a number");

        let err = parse_id("0", ItemType::Product).unwrap_err();
        assert_eq!(err.to_string(), "Product ID must be greater than zero");
    }
}
