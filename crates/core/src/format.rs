//! Stateless formatting of user-visible messages and timestamps.
//!
//! Every function here is pure: same input, same output, no shared state.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::id::{ComponentId, ItemType, ProductId};

/// Message for the "Quantity must be greater than zero" validation.
pub const QUANTITY_MUST_BE_POSITIVE: &str = "Quantity must be greater than zero";

/// Message shown to clients for any failure the service cannot explain.
pub const UNEXPECTED_FAILURE: &str = "Sorry, something went wrong";

pub fn item_not_found(kind: ItemType, id: i64) -> String {
    format!("{kind} '{id}' was not found")
}

pub fn association_missing(product_id: ProductId, component_id: ComponentId) -> String {
    format!("Product '{product_id}' does not contain Component '{component_id}'")
}

pub fn association_exists(product_id: ProductId, component_id: ComponentId) -> String {
    format!("Product '{product_id}' already contains Component '{component_id}'")
}

pub fn component_in_use(component_id: ComponentId) -> String {
    format!("Component '{component_id}' is used in some product(s)")
}

pub fn product_has_components(product_id: ProductId) -> String {
    format!("Product '{product_id}' still contains some component(s)")
}

/// ISO-8601 instant in UTC, truncated to whole seconds (`2023-03-19T12:31:16Z`).
pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn timestamp_drops_sub_second_precision() {
        let at = Utc.with_ymd_and_hms(2023, 3, 19, 12, 31, 16).unwrap()
            + chrono::Duration::milliseconds(789);
        assert_eq!(timestamp(at), "2023-03-19T12:31:16Z");
    }

    #[test]
    fn in_use_messages() {
        assert_eq!(
            component_in_use(ComponentId::new(3)),
            "Component '3' is used in some product(s)"
        );
        assert_eq!(
            product_has_components(ProductId::new(4)),
            "Product '4' still contains some component(s)"
        );
    }

    proptest! {
        #[test]
        fn timestamp_is_whole_seconds_in_utc(secs in 0i64..4_102_444_800, nanos in 0u32..1_000_000_000) {
            let at = Utc.timestamp_opt(secs, nanos).unwrap();
            let text = timestamp(at);

            prop_assert_eq!(text.len(), "2023-03-19T12:31:16Z".len());
            prop_assert!(text.ends_with('Z'));
            let parsed = DateTime::parse_from_rfc3339(&text).unwrap();
            prop_assert_eq!(parsed.timestamp(), secs);
        }
    }
}
