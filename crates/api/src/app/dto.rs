use serde::{Deserialize, Serialize};

use catalog_core::format::{self, QUANTITY_MUST_BE_POSITIVE};
use catalog_core::{Audited, Entity};
use catalog_products::{Component, Item, ItemKind, ItemPatch, NewItem, Page, Quantity};

use crate::app::errors::{ApiError, ApiResult};

// -------------------------
// Request DTOs
// -------------------------

/// Body of item create (`POST`) and edit (`PATCH`) requests.
#[derive(Debug, Default, Deserialize)]
pub struct ItemRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl ItemRequest {
    pub fn into_new_item(self) -> NewItem {
        NewItem::new(self.name.unwrap_or_default(), self.description)
    }

    pub fn into_patch(self) -> ItemPatch {
        ItemPatch {
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ComponentAddRequest {
    pub component_id: Option<i64>,
    pub quantity: Option<i64>,
}

impl ComponentAddRequest {
    /// Returns `(component_id, quantity)`; quantity defaults to one.
    pub fn validate(&self) -> ApiResult<(i64, i64)> {
        let component_id = self
            .component_id
            .ok_or_else(|| ApiError::bad_request("'component_id' is required"))?;
        let quantity = self.quantity.unwrap_or(i64::from(Quantity::ONE.get()));
        if quantity < 1 {
            return Err(ApiError::bad_request(QUANTITY_MUST_BE_POSITIVE));
        }
        Ok((component_id, quantity))
    }
}

#[derive(Debug, Deserialize)]
pub struct ComponentQuantityRequest {
    pub quantity: Option<i64>,
}

impl ComponentQuantityRequest {
    pub fn validate(&self) -> ApiResult<i64> {
        let quantity = self
            .quantity
            .ok_or_else(|| ApiError::bad_request("'quantity' is required"))?;
        if quantity < 1 {
            return Err(ApiError::bad_request(QUANTITY_MUST_BE_POSITIVE));
        }
        Ok(quantity)
    }
}

/// `?page=&size=` query parameters, parsed by hand so a non-number gets a
/// readable message.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub size: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> ApiResult<Option<i64>> {
        parse_number("page", self.page.as_deref())
    }

    pub fn size(&self) -> ApiResult<Option<i64>> {
        parse_number("size", self.size.as_deref())
    }
}

/// Parse an optional numeric parameter named `name`.
pub fn parse_number(name: &str, raw: Option<&str>) -> ApiResult<Option<i64>> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ApiError::bad_request(format!("'{name}' must be a number"))),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created: String,
    pub modified: String,
}

impl<K: ItemKind> From<&Item<K>> for ItemResponse {
    fn from(item: &Item<K>) -> Self {
        Self {
            id: item.id().into(),
            name: item.name().to_string(),
            description: item.description().map(str::to_string),
            created: format::timestamp(item.created_at()),
            modified: format::timestamp(item.modified_at()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaginationResponse {
    pub page: u32,
    pub size: u32,
    pub count: usize,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationResponse,
}

impl<T> ListResponse<T> {
    pub fn from_page<U>(page: Page<U>, f: impl Fn(&U) -> T) -> Self {
        Self {
            pagination: PaginationResponse {
                page: page.request.page(),
                size: page.request.size(),
                count: page.count(),
                total: page.total,
            },
            data: page.items.iter().map(f).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductComponentResponse {
    pub component: ItemResponse,
    pub quantity: i32,
}

impl From<&(Component, Quantity)> for ProductComponentResponse {
    fn from((component, quantity): &(Component, Quantity)) -> Self {
        Self {
            component: ItemResponse::from(component),
            quantity: quantity.get(),
        }
    }
}
