use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::cart_store::CartStore;
use crate::domain::commands::cart::{
    AddMealToCartCommand, AdjustQuantityCommand, CartSnapshot, RemoveEntryCommand,
    SelectChildCommand, SelectChildResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::cart::{Cart, CartEntry, CartEntryKind};
use crate::domain::resolve_parent;
use crate::storage::traits::{CatalogStorage, FamilyStorage};

/// Largest quantity a single add may carry.
const MAX_LINE_QUANTITY: u32 = 100;

/// Operations over the session cart: add, adjust, remove, clear, totals, and
/// child selection. Every mutator loads the cart, applies one pure
/// transformation, and saves the result.
#[derive(Clone)]
pub struct CartService {
    store: CartStore,
    catalog: Arc<dyn CatalogStorage>,
    family: Arc<dyn FamilyStorage>,
}

impl CartService {
    pub fn new(
        store: CartStore,
        catalog: Arc<dyn CatalogStorage>,
        family: Arc<dyn FamilyStorage>,
    ) -> Self {
        Self {
            store,
            catalog,
            family,
        }
    }

    /// The current cart plus the selected-child marker.
    pub async fn view_cart(&self, user_id: i64) -> DomainResult<CartSnapshot> {
        let parent = resolve_parent(self.family.as_ref(), user_id).await?;
        let cart = self.store.load_cart(parent.parent_id).await?;
        let selected_child_id = self.store.load_selected_child(parent.parent_id).await?;

        Ok(CartSnapshot {
            cart,
            selected_child_id,
        })
    }

    /// Add a pre-made meal to the cart, merging with an existing entry for
    /// the same meal.
    pub async fn add_meal(&self, command: AddMealToCartCommand) -> DomainResult<Cart> {
        info!(
            "Adding meal {} x{} to cart for user {}",
            command.meal_id, command.quantity, command.user_id
        );

        validate_quantity(command.quantity)?;

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;
        let meal = self
            .catalog
            .get_meal(command.meal_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("meal {} not found", command.meal_id)))?;

        let mut cart = self.store.load_cart(parent.parent_id).await?;
        cart.add_or_merge(CartEntry {
            kind: CartEntryKind::PremadeMeal,
            reference_id: meal.meal_id,
            name: meal.name,
            unit_price: meal.fixed_price,
            quantity: command.quantity,
            image_url: meal.image_url,
            description: meal.description,
        });
        self.store.save_cart(parent.parent_id, &cart).await?;

        Ok(cart)
    }

    /// Bump an entry's quantity up or down; it never drops below 1 and an
    /// unknown key is a no-op.
    pub async fn adjust_quantity(&self, command: AdjustQuantityCommand) -> DomainResult<Cart> {
        info!(
            "Adjusting quantity by {} for entry {:?} (user {})",
            command.delta, command.key, command.user_id
        );

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;
        let mut cart = self.store.load_cart(parent.parent_id).await?;
        cart.adjust_quantity(&command.key, command.delta);
        self.store.save_cart(parent.parent_id, &cart).await?;

        Ok(cart)
    }

    /// Remove one entry from the cart; removing an absent entry is a no-op.
    pub async fn remove_entry(&self, command: RemoveEntryCommand) -> DomainResult<Cart> {
        info!("Removing entry {:?} (user {})", command.key, command.user_id);

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;
        let mut cart = self.store.load_cart(parent.parent_id).await?;
        if !cart.remove(&command.key) {
            warn!("Entry {:?} was not in the cart", command.key);
        }
        self.store.save_cart(parent.parent_id, &cart).await?;

        Ok(cart)
    }

    /// Drop the cart and the selected child together.
    pub async fn clear_cart(&self, user_id: i64) -> DomainResult<()> {
        info!("Clearing cart for user {}", user_id);

        let parent = resolve_parent(self.family.as_ref(), user_id).await?;
        self.store.clear_cart(parent.parent_id).await?;
        self.store.clear_selected_child(parent.parent_id).await?;

        Ok(())
    }

    /// Mark which child the order is for. The child must exist and belong to
    /// the acting parent.
    pub async fn select_child(&self, command: SelectChildCommand) -> DomainResult<SelectChildResult> {
        info!(
            "Selecting child {} for user {}",
            command.child_id, command.user_id
        );

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;
        let child = self.family.get_child(command.child_id).await?;

        let child = match child {
            Some(child) if child.belongs_to(&parent) => child,
            _ => {
                return Err(DomainError::Authorization(format!(
                    "child {} does not belong to your account",
                    command.child_id
                )))
            }
        };

        self.store
            .save_selected_child(parent.parent_id, child.child_id)
            .await?;

        Ok(SelectChildResult { child })
    }

    /// Merge a batch of entries into the cart and save once. Used by the
    /// custom meal builder and the reorder adapter, which both add to the
    /// cart without replacing what is already there.
    pub(crate) async fn merge_entries(
        &self,
        parent_id: i64,
        entries: Vec<CartEntry>,
    ) -> DomainResult<Cart> {
        let mut cart = self.store.load_cart(parent_id).await?;
        for entry in entries {
            cart.add_or_merge(entry);
        }
        self.store.save_cart(parent_id, &cart).await?;

        Ok(cart)
    }
}

fn validate_quantity(quantity: u32) -> DomainResult<()> {
    if quantity == 0 || quantity > MAX_LINE_QUANTITY {
        return Err(DomainError::Validation(format!(
            "quantity must be between 1 and {}",
            MAX_LINE_QUANTITY
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::cart::CartEntryKey;
    use crate::storage::sqlite::test_support::TestContext;
    use crate::storage::sqlite::{CatalogRepository, FamilyRepository, SessionRepository};
    use rust_decimal_macros::dec;

    async fn setup_test() -> (TestContext, CartService) {
        let ctx = TestContext::new().await;
        let service = CartService::new(
            CartStore::new(Arc::new(SessionRepository::new(ctx.db.clone()))),
            Arc::new(CatalogRepository::new(ctx.db.clone())),
            Arc::new(FamilyRepository::new(ctx.db.clone())),
        );
        (ctx, service)
    }

    #[tokio::test]
    async fn test_add_meal_and_view() {
        let (ctx, service) = setup_test().await;
        ctx.seed_parent(10, "Dana").await;
        let meal_id = ctx.seed_meal("Turkey Wrap", dec!(5.50)).await;

        let cart = service
            .add_meal(AddMealToCartCommand {
                user_id: 10,
                meal_id,
                quantity: 2,
            })
            .await
            .unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.total(), dec!(11.00));

        let snapshot = service.view_cart(10).await.unwrap();
        assert_eq!(snapshot.cart, cart);
        assert_eq!(snapshot.selected_child_id, None);
    }

    #[tokio::test]
    async fn test_add_same_meal_twice_merges() {
        let (ctx, service) = setup_test().await;
        ctx.seed_parent(10, "Dana").await;
        let meal_id = ctx.seed_meal("Turkey Wrap", dec!(5.50)).await;

        for quantity in [2, 3] {
            service
                .add_meal(AddMealToCartCommand {
                    user_id: 10,
                    meal_id,
                    quantity,
                })
                .await
                .unwrap();
        }

        let cart = service.view_cart(10).await.unwrap().cart;
        assert_eq!(cart.len(), 1);
        let key = CartEntryKey {
            kind: CartEntryKind::PremadeMeal,
            reference_id: meal_id,
        };
        assert_eq!(cart.get(&key).unwrap().quantity, 5);
        assert_eq!(cart.get(&key).unwrap().unit_price, dec!(5.50));
    }

    #[tokio::test]
    async fn test_add_unknown_meal_is_not_found() {
        let (ctx, service) = setup_test().await;
        ctx.seed_parent(10, "Dana").await;

        let err = service
            .add_meal(AddMealToCartCommand {
                user_id: 10,
                meal_id: 999,
                quantity: 1,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_add_with_bad_quantity_is_validation_error() {
        let (ctx, service) = setup_test().await;
        ctx.seed_parent(10, "Dana").await;
        let meal_id = ctx.seed_meal("Turkey Wrap", dec!(5.50)).await;

        for quantity in [0, 101] {
            let err = service
                .add_meal(AddMealToCartCommand {
                    user_id: 10,
                    meal_id,
                    quantity,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn test_adjust_quantity_floor() {
        let (ctx, service) = setup_test().await;
        ctx.seed_parent(10, "Dana").await;
        let meal_id = ctx.seed_meal("Turkey Wrap", dec!(5.50)).await;

        service
            .add_meal(AddMealToCartCommand {
                user_id: 10,
                meal_id,
                quantity: 2,
            })
            .await
            .unwrap();

        let key = CartEntryKey {
            kind: CartEntryKind::PremadeMeal,
            reference_id: meal_id,
        };
        let cart = service
            .adjust_quantity(AdjustQuantityCommand {
                user_id: 10,
                key,
                delta: -50,
            })
            .await
            .unwrap();

        assert_eq!(cart.get(&key).unwrap().quantity, 1);
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let (ctx, service) = setup_test().await;
        let parent_id = ctx.seed_parent(10, "Dana").await;
        let child_id = ctx.seed_child(parent_id, "Riley").await;
        let meal_id = ctx.seed_meal("Turkey Wrap", dec!(5.50)).await;

        service
            .add_meal(AddMealToCartCommand {
                user_id: 10,
                meal_id,
                quantity: 1,
            })
            .await
            .unwrap();
        service
            .select_child(SelectChildCommand {
                user_id: 10,
                child_id,
            })
            .await
            .unwrap();

        let cart = service
            .remove_entry(RemoveEntryCommand {
                user_id: 10,
                key: CartEntryKey {
                    kind: CartEntryKind::PremadeMeal,
                    reference_id: meal_id,
                },
            })
            .await
            .unwrap();
        assert!(cart.is_empty());

        // Clear drops the selection too
        service.clear_cart(10).await.unwrap();
        let snapshot = service.view_cart(10).await.unwrap();
        assert!(snapshot.cart.is_empty());
        assert_eq!(snapshot.selected_child_id, None);
    }

    #[tokio::test]
    async fn test_select_child_requires_ownership() {
        let (ctx, service) = setup_test().await;
        let dana = ctx.seed_parent(10, "Dana").await;
        let sam = ctx.seed_parent(11, "Sam").await;
        let riley = ctx.seed_child(dana, "Riley").await;
        let casey = ctx.seed_child(sam, "Casey").await;

        let result = service
            .select_child(SelectChildCommand {
                user_id: 10,
                child_id: riley,
            })
            .await
            .unwrap();
        assert_eq!(result.child.name, "Riley");

        // Someone else's child
        let err = service
            .select_child(SelectChildCommand {
                user_id: 10,
                child_id: casey,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));

        // Nonexistent child
        let err = service
            .select_child(SelectChildCommand {
                user_id: 10,
                child_id: 999,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Authorization(_)));
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let (_ctx, service) = setup_test().await;

        let err = service.view_cart(42).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }
}
