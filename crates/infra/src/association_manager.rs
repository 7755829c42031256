//! Product/component association rules.
//!
//! The [`AssociationManager`] is the only writer of association rows. Every
//! operation resolves the items it touches through the item stores (no
//! caching across calls) and checks, in this fixed order:
//!
//! ```text
//! quantity (add / update only)
//!   ↓
//! product exists
//!   ↓
//! component exists (not for remove)
//!   ↓
//! association state (absent for add, present for update / remove)
//!   ↓
//! single association write
//! ```
//!
//! Per (product, component) pair the legal transitions are
//! `Absent → Present` (add), `Present → Present'` (quantity update) and
//! `Present → Absent` (remove). Add on an existing pair and update on a missing
//! pair are rejected, never corrected.
//!
//! The lookup-then-insert in `add_component_to_product` is not atomic on its
//! own; both association stores reject a duplicate pair, and that rejection is
//! reported as the same conflict the lookup would have produced.

use tracing::{debug, info, warn};

use catalog_core::{ComponentId, DomainError, DomainResult, Entity, ProductId};
use catalog_products::{
    Component, ComponentKind, NewProductComponent, Page, PageRequest, Product, ProductComponent,
    ProductKind, Quantity,
};

use crate::association_store::{AssociationStore, DynAssociationStore};
use crate::error::StoreError;
use crate::item_store::{DynItemStore, ItemStore};

/// The components of one product with their quantities, ordered by
/// component id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductComponents {
    entries: Vec<(Component, Quantity)>,
}

impl ProductComponents {
    pub fn entries(&self) -> &[(Component, Quantity)] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<(Component, Quantity)> {
        self.entries
    }

    pub fn quantity_of(&self, component_id: ComponentId) -> Option<Quantity> {
        self.entries
            .iter()
            .find(|(component, _)| component.id() == component_id)
            .map(|(_, quantity)| *quantity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Enforces the rules under which a product contains a component.
///
/// Generic over its three stores so tests can inject instrumented fakes; the
/// defaults are the type-erased stores the API wires up.
#[derive(Debug, Clone)]
pub struct AssociationManager<
    P = DynItemStore<ProductKind>,
    C = DynItemStore<ComponentKind>,
    A = DynAssociationStore,
> {
    products: P,
    components: C,
    associations: A,
}

impl<P, C, A> AssociationManager<P, C, A> {
    pub fn new(products: P, components: C, associations: A) -> Self {
        Self {
            products,
            components,
            associations,
        }
    }

    pub fn associations(&self) -> &A {
        &self.associations
    }
}

impl<P, C, A> AssociationManager<P, C, A>
where
    P: ItemStore<ProductKind>,
    C: ItemStore<ComponentKind>,
    A: AssociationStore,
{
    async fn require_product(&self, id: ProductId) -> DomainResult<Product> {
        self.products
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::product_not_found(id))
    }

    async fn require_component(&self, id: ComponentId) -> DomainResult<Component> {
        self.components
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::component_not_found(id))
    }

    async fn require_association(
        &self,
        product_id: ProductId,
        component_id: ComponentId,
    ) -> DomainResult<ProductComponent> {
        self.associations
            .find(product_id, component_id)
            .await?
            .ok_or_else(|| DomainError::association_not_found(product_id, component_id))
    }

    /// Make `product_id` contain `quantity` units of `component_id`.
    pub async fn add_component_to_product(
        &self,
        product_id: ProductId,
        component_id: ComponentId,
        quantity: i64,
    ) -> DomainResult<ProductComponent> {
        let quantity = Quantity::new(quantity)?;
        self.require_product(product_id).await?;
        self.require_component(component_id).await?;

        if self.associations.find(product_id, component_id).await?.is_some() {
            return Err(DomainError::already_contains(product_id, component_id));
        }

        let new = NewProductComponent {
            product_id,
            component_id,
            quantity,
        };
        let stored = match self.associations.insert(new).await {
            Ok(stored) => stored,
            Err(StoreError::UniqueViolation(constraint)) => {
                debug!(%product_id, %component_id, %constraint, "association insert lost a race");
                return Err(DomainError::already_contains(product_id, component_id));
            }
            Err(other) => return Err(other.into()),
        };

        info!(%product_id, %component_id, %quantity, "component added to product");
        Ok(stored)
    }

    /// Drop the association. Only the product and the association itself are
    /// checked; a deleted component's leftover row can still be removed.
    pub async fn remove_component_from_product(
        &self,
        product_id: ProductId,
        component_id: ComponentId,
    ) -> DomainResult<()> {
        self.require_product(product_id).await?;
        let association = self.require_association(product_id, component_id).await?;

        if !self.associations.delete(association.id()).await? {
            return Err(DomainError::association_not_found(product_id, component_id));
        }

        info!(%product_id, %component_id, "component removed from product");
        Ok(())
    }

    pub async fn update_component_quantity(
        &self,
        product_id: ProductId,
        component_id: ComponentId,
        quantity: i64,
    ) -> DomainResult<ProductComponent> {
        let quantity = Quantity::new(quantity)?;
        self.require_product(product_id).await?;
        self.require_component(component_id).await?;
        let mut association = self.require_association(product_id, component_id).await?;

        association.set_quantity(quantity);
        if !self.associations.update(&association).await? {
            return Err(DomainError::association_not_found(product_id, component_id));
        }

        info!(%product_id, %component_id, %quantity, "component quantity updated");
        Ok(association)
    }

    pub async fn components_for_product(
        &self,
        product_id: ProductId,
    ) -> DomainResult<ProductComponents> {
        self.require_product(product_id).await?;

        let rows = self.associations.list_by_product(product_id).await?;
        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match self.components.find_by_id(row.component_id).await? {
                Some(component) => entries.push((component, row.quantity())),
                None => warn!(
                    %product_id,
                    component_id = %row.component_id,
                    "association references a missing component"
                ),
            }
        }

        Ok(ProductComponents { entries })
    }

    /// One page of the products that contain `component_id`, ordered by
    /// product id. Paging happens after the matching rows are collected;
    /// only the products on the requested page are loaded.
    pub async fn products_by_component(
        &self,
        component_id: ComponentId,
        request: PageRequest,
    ) -> DomainResult<Page<Product>> {
        self.require_component(component_id).await?;

        let rows = self.associations.list_by_component(component_id).await?;
        let total = rows.len() as u64;

        let mut product_ids: Vec<ProductId> = rows.iter().map(|r| r.product_id).collect();
        product_ids.sort();
        product_ids.dedup();

        let ids = Page::paginate(product_ids, request);
        let mut products = Vec::with_capacity(ids.count());
        for id in ids.items {
            match self.products.find_by_id(id).await? {
                Some(product) => products.push(product),
                None => warn!(
                    product_id = %id,
                    %component_id,
                    "association references a missing product"
                ),
            }
        }

        Ok(Page::new(products, request, total))
    }

    pub async fn is_component_in_use(&self, component_id: ComponentId) -> DomainResult<bool> {
        Ok(self.associations.count_by_component(component_id).await? > 0)
    }

    pub async fn product_has_components(&self, product_id: ProductId) -> DomainResult<bool> {
        Ok(self.associations.count_by_product(product_id).await? > 0)
    }
}
