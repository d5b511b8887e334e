use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::cart_service::CartService;
use crate::domain::commands::reorder::{ReorderOrderCommand, ReorderResult, ReorderSavedMealCommand};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::cart::{CartEntry, CartEntryKind};
use crate::domain::models::order::OrderLineRef;
use crate::domain::resolve_parent;
use crate::storage::traits::{CatalogStorage, FamilyStorage, OrderStorage, SavedMealStorage};

/// Feeds past orders and saved favorites back into the cart.
///
/// Reordering is re-pricing, not replay: every line is resolved against the
/// current catalog, so prices and names are today's. Lines whose catalog
/// record has since disappeared are skipped and counted rather than failing
/// the whole operation.
#[derive(Clone)]
pub struct ReorderService {
    catalog: Arc<dyn CatalogStorage>,
    family: Arc<dyn FamilyStorage>,
    orders: Arc<dyn OrderStorage>,
    saved_meals: Arc<dyn SavedMealStorage>,
    cart_service: CartService,
}

impl ReorderService {
    pub fn new(
        catalog: Arc<dyn CatalogStorage>,
        family: Arc<dyn FamilyStorage>,
        orders: Arc<dyn OrderStorage>,
        saved_meals: Arc<dyn SavedMealStorage>,
        cart_service: CartService,
    ) -> Self {
        Self {
            catalog,
            family,
            orders,
            saved_meals,
            cart_service,
        }
    }

    /// Merge a past order's lines back into the cart at current prices.
    pub async fn reorder_order(&self, command: ReorderOrderCommand) -> DomainResult<ReorderResult> {
        info!(
            "Reordering order {} for user {}",
            command.order_id, command.user_id
        );

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;

        let (order, lines) = self
            .orders
            .get_order_with_lines(command.order_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("order {} not found", command.order_id))
            })?;

        if order.parent_id != parent.parent_id {
            return Err(DomainError::Authorization(format!(
                "order {} does not belong to your account",
                command.order_id
            )));
        }

        let mut entries = Vec::new();
        let mut skipped_lines = 0;

        for line in &lines {
            match self.resolve_line(line.reference, line.quantity).await? {
                Some(entry) => entries.push(entry),
                None => {
                    warn!(
                        "Skipping order {} line {:?}: no longer in the catalog",
                        command.order_id, line.reference
                    );
                    skipped_lines += 1;
                }
            }
        }

        let merged_lines = entries.len();
        let cart = self
            .cart_service
            .merge_entries(parent.parent_id, entries)
            .await?;

        Ok(ReorderResult {
            cart,
            merged_lines,
            skipped_lines,
        })
    }

    /// Merge a saved favorite's items into the cart, one of each.
    pub async fn reorder_saved_meal(
        &self,
        command: ReorderSavedMealCommand,
    ) -> DomainResult<ReorderResult> {
        info!(
            "Reordering saved meal {} for user {}",
            command.saved_meal_id, command.user_id
        );

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;

        let saved_meal = self
            .saved_meals
            .get_saved_meal(command.saved_meal_id)
            .await?
            .ok_or_else(|| {
                DomainError::NotFound(format!("saved meal {} not found", command.saved_meal_id))
            })?;

        if saved_meal.parent_id != parent.parent_id {
            return Err(DomainError::Authorization(format!(
                "saved meal {} does not belong to your account",
                command.saved_meal_id
            )));
        }

        let mut entries = Vec::new();
        let mut skipped_lines = 0;

        for item_id in &saved_meal.item_ids {
            match self.resolve_line(OrderLineRef::Item(*item_id), 1).await? {
                Some(entry) => entries.push(entry),
                None => {
                    warn!(
                        "Skipping saved meal {} item {}: no longer in the catalog",
                        command.saved_meal_id, item_id
                    );
                    skipped_lines += 1;
                }
            }
        }

        let merged_lines = entries.len();
        let cart = self
            .cart_service
            .merge_entries(parent.parent_id, entries)
            .await?;

        Ok(ReorderResult {
            cart,
            merged_lines,
            skipped_lines,
        })
    }

    /// Build a cart entry for one historical line from the current catalog.
    /// Returns None when the referenced record no longer exists.
    async fn resolve_line(
        &self,
        reference: OrderLineRef,
        quantity: u32,
    ) -> DomainResult<Option<CartEntry>> {
        let entry = match reference {
            OrderLineRef::Meal(meal_id) => {
                self.catalog.get_meal(meal_id).await?.map(|meal| CartEntry {
                    kind: CartEntryKind::PremadeMeal,
                    reference_id: meal.meal_id,
                    name: meal.name,
                    unit_price: meal.fixed_price,
                    quantity,
                    image_url: meal.image_url,
                    description: meal.description,
                })
            }
            OrderLineRef::Item(item_id) => {
                self.catalog.get_item(item_id).await?.map(|item| CartEntry {
                    kind: CartEntryKind::BaseItem,
                    reference_id: item.item_id,
                    name: item.name,
                    unit_price: item.unit_price,
                    quantity,
                    image_url: None,
                    description: item.description,
                })
            }
        };
        Ok(entry)
    }
}
