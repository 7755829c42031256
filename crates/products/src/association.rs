//! "Product contains N of Component" association records.

use serde::{Deserialize, Serialize};

use catalog_core::format::QUANTITY_MUST_BE_POSITIVE;
use catalog_core::{
    ComponentId, DomainError, DomainResult, Entity, ProductComponentId, ProductId, ValueObject,
};

/// How many units of a component a product contains. Always at least one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    pub const ONE: Quantity = Quantity(1);

    pub fn new(raw: i64) -> DomainResult<Self> {
        if raw < 1 {
            return Err(DomainError::bad_request(QUANTITY_MUST_BE_POSITIVE));
        }
        let value = i32::try_from(raw).map_err(|_| {
            DomainError::bad_request(format!("Quantity must not exceed {}", i32::MAX))
        })?;
        Ok(Self(value))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl ValueObject for Quantity {}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Quantity::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

/// A persisted association row.
///
/// Holds identifiers only: the referenced product and component are resolved
/// through the item stores whenever they are needed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductComponent {
    pub id: ProductComponentId,
    pub product_id: ProductId,
    pub component_id: ComponentId,
    quantity: Quantity,
}

impl ProductComponent {
    pub fn new(
        id: ProductComponentId,
        product_id: ProductId,
        component_id: ComponentId,
        quantity: Quantity,
    ) -> Self {
        Self {
            id,
            product_id,
            component_id,
            quantity,
        }
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// The only mutation an association supports; the pair itself is fixed.
    pub fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    pub fn key(&self) -> (ProductId, ComponentId) {
        (self.product_id, self.component_id)
    }
}

impl Entity for ProductComponent {
    type Id = ProductComponentId;

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// An association that has not been stored yet (no surrogate id).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewProductComponent {
    pub product_id: ProductId,
    pub component_id: ComponentId,
    pub quantity: Quantity,
}

impl NewProductComponent {
    pub fn with_id(self, id: ProductComponentId) -> ProductComponent {
        ProductComponent::new(id, self.product_id, self.component_id, self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_and_negative_quantities_are_rejected() {
        for raw in [0, -1, i64::MIN] {
            let err = Quantity::new(raw).unwrap_err();
            assert_eq!(err.to_string(), "Quantity must be greater than zero");
        }
    }

    #[test]
    fn oversized_quantity_is_rejected() {
        assert!(Quantity::new(i64::from(i32::MAX) + 1).is_err());
        assert_eq!(Quantity::new(i64::from(i32::MAX)).unwrap().get(), i32::MAX);
    }

    #[test]
    fn set_quantity_keeps_the_pair() {
        let mut pc = NewProductComponent {
            product_id: ProductId::new(1),
            component_id: ComponentId::new(2),
            quantity: Quantity::ONE,
        }
        .with_id(ProductComponentId::new(10));

        pc.set_quantity(Quantity::new(7).unwrap());
        assert_eq!(pc.quantity().get(), 7);
        assert_eq!(pc.key(), (ProductId::new(1), ComponentId::new(2)));
        assert_eq!(pc.id(), ProductComponentId::new(10));
    }

    #[test]
    fn quantity_deserializes_with_validation() {
        let q: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(q.get(), 4);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    proptest! {
        #[test]
        fn quantity_accepts_exactly_the_positive_i32_range(raw in any::<i64>()) {
            let ok = Quantity::new(raw).is_ok();
            prop_assert_eq!(ok, raw >= 1 && raw <= i64::from(i32::MAX));
        }
    }
}
