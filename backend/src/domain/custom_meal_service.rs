use std::sync::Arc;

use tracing::info;

use crate::domain::cart_service::CartService;
use crate::domain::cart_store::CartStore;
use crate::domain::commands::custom_meal::{
    AddItemCommand, AdjustItemCommand, RemoveItemCommand, SaveFavoriteCommand, SaveFavoriteResult,
};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::cart::{Cart, CartEntry, CartEntryKind};
use crate::domain::models::catalog::NewSavedMeal;
use crate::domain::models::custom_meal::{CustomMeal, CustomMealEntry};
use crate::domain::resolve_parent;
use crate::storage::traits::{CatalogStorage, FamilyStorage, SavedMealStorage};

const MAX_LINE_QUANTITY: u32 = 100;
const MAX_FAVORITE_NAME_LENGTH: usize = 255;

/// The custom meal builder: a second cart-like staging area holding base
/// items only. Entries snapshot nutrition and allergy tags at add-time. The
/// finished meal is either promoted into the cart or saved as a favorite;
/// both paths clear the builder on success.
#[derive(Clone)]
pub struct CustomMealService {
    store: CartStore,
    catalog: Arc<dyn CatalogStorage>,
    family: Arc<dyn FamilyStorage>,
    saved_meals: Arc<dyn SavedMealStorage>,
    cart_service: CartService,
}

impl CustomMealService {
    pub fn new(
        store: CartStore,
        catalog: Arc<dyn CatalogStorage>,
        family: Arc<dyn FamilyStorage>,
        saved_meals: Arc<dyn SavedMealStorage>,
        cart_service: CartService,
    ) -> Self {
        Self {
            store,
            catalog,
            family,
            saved_meals,
            cart_service,
        }
    }

    pub async fn view(&self, user_id: i64) -> DomainResult<CustomMeal> {
        let parent = resolve_parent(self.family.as_ref(), user_id).await?;
        self.store.load_custom_meal(parent.parent_id).await
    }

    /// Add a base item, snapshotting its nutrition and allergy tags from the
    /// catalog. Duplicate items merge quantities.
    pub async fn add_item(&self, command: AddItemCommand) -> DomainResult<CustomMeal> {
        info!(
            "Adding item {} x{} to custom meal for user {}",
            command.item_id, command.quantity, command.user_id
        );

        validate_quantity(command.quantity)?;

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;
        let item = self
            .catalog
            .get_item(command.item_id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("item {} not found", command.item_id)))?;

        let mut meal = self.store.load_custom_meal(parent.parent_id).await?;
        meal.add_or_merge(CustomMealEntry {
            item_id: item.item_id,
            name: item.name,
            unit_price: item.unit_price,
            quantity: command.quantity,
            nutrition: item.nutrition,
            allergies: item.allergies,
        });
        self.store.save_custom_meal(parent.parent_id, &meal).await?;

        Ok(meal)
    }

    pub async fn adjust_item(&self, command: AdjustItemCommand) -> DomainResult<CustomMeal> {
        info!(
            "Adjusting custom meal item {} by {} (user {})",
            command.item_id, command.delta, command.user_id
        );

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;
        let mut meal = self.store.load_custom_meal(parent.parent_id).await?;
        meal.adjust_quantity(command.item_id, command.delta);
        self.store.save_custom_meal(parent.parent_id, &meal).await?;

        Ok(meal)
    }

    pub async fn remove_item(&self, command: RemoveItemCommand) -> DomainResult<CustomMeal> {
        info!(
            "Removing custom meal item {} (user {})",
            command.item_id, command.user_id
        );

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;
        let mut meal = self.store.load_custom_meal(parent.parent_id).await?;
        meal.remove(command.item_id);
        self.store.save_custom_meal(parent.parent_id, &meal).await?;

        Ok(meal)
    }

    pub async fn clear(&self, user_id: i64) -> DomainResult<()> {
        info!("Clearing custom meal for user {}", user_id);

        let parent = resolve_parent(self.family.as_ref(), user_id).await?;
        self.store.clear_custom_meal(parent.parent_id).await
    }

    /// Convert every builder entry into a base-item cart entry and merge the
    /// batch into the cart, then clear the builder. Nothing is promoted if
    /// the builder is empty.
    pub async fn promote_to_cart(&self, user_id: i64) -> DomainResult<Cart> {
        info!("Promoting custom meal into cart for user {}", user_id);

        let parent = resolve_parent(self.family.as_ref(), user_id).await?;
        let meal = self.store.load_custom_meal(parent.parent_id).await?;

        if meal.is_empty() {
            return Err(DomainError::EmptyCart(
                "your custom meal is empty".to_string(),
            ));
        }

        let entries: Vec<CartEntry> = meal
            .entries()
            .map(|e| CartEntry {
                kind: CartEntryKind::BaseItem,
                reference_id: e.item_id,
                name: e.name.clone(),
                unit_price: e.unit_price,
                quantity: e.quantity,
                image_url: None,
                description: Some("Individual item from custom meal".to_string()),
            })
            .collect();

        let cart = self
            .cart_service
            .merge_entries(parent.parent_id, entries)
            .await?;
        self.store.clear_custom_meal(parent.parent_id).await?;

        Ok(cart)
    }

    /// Persist the current builder contents as a named favorite for one of
    /// the parent's children, then clear the builder.
    pub async fn save_favorite(
        &self,
        command: SaveFavoriteCommand,
    ) -> DomainResult<SaveFavoriteResult> {
        info!(
            "Saving custom meal as favorite {:?} for user {}",
            command.name, command.user_id
        );

        let name = command.name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "favorite name cannot be empty".to_string(),
            ));
        }
        if name.len() > MAX_FAVORITE_NAME_LENGTH {
            return Err(DomainError::Validation(format!(
                "favorite name cannot exceed {} characters",
                MAX_FAVORITE_NAME_LENGTH
            )));
        }

        let parent = resolve_parent(self.family.as_ref(), command.user_id).await?;

        let child = self.family.get_child(command.child_id).await?;
        if !child.is_some_and(|c| c.belongs_to(&parent)) {
            return Err(DomainError::Authorization(format!(
                "child {} does not belong to your account",
                command.child_id
            )));
        }

        let meal = self.store.load_custom_meal(parent.parent_id).await?;
        if meal.is_empty() {
            return Err(DomainError::EmptyCart(
                "your custom meal is empty".to_string(),
            ));
        }

        let new_saved_meal = NewSavedMeal {
            parent_id: parent.parent_id,
            child_id: command.child_id,
            name: name.to_string(),
            item_ids: meal.item_ids(),
        };
        let saved_meal_id = self.saved_meals.create_saved_meal(&new_saved_meal).await?;

        self.store.clear_custom_meal(parent.parent_id).await?;

        Ok(SaveFavoriteResult {
            saved_meal: crate::domain::models::catalog::SavedMeal {
                saved_meal_id,
                parent_id: new_saved_meal.parent_id,
                child_id: new_saved_meal.child_id,
                name: new_saved_meal.name,
                item_ids: new_saved_meal.item_ids,
            },
        })
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
