//! Session-scoped persistence for the cart, the custom meal builder, and the
//! selected-child marker. No business logic lives here; this is the only
//! place that knows how those values are keyed and serialized.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::cart::Cart;
use crate::domain::models::custom_meal::CustomMeal;
use crate::storage::traits::SessionStorage;

/// Wraps the session store with typed load/save/clear operations.
///
/// `load_*` never fails on a missing or unreadable blob: a cart that cannot
/// be parsed is treated as empty, so a corrupted session can always recover
/// by starting over.
#[derive(Clone)]
pub struct CartStore {
    session: Arc<dyn SessionStorage>,
}

fn cart_key(parent_id: i64) -> String {
    format!("cart::{}", parent_id)
}

fn selected_child_key(parent_id: i64) -> String {
    format!("selected_child::{}", parent_id)
}

fn custom_meal_key(parent_id: i64) -> String {
    format!("custom_meal::{}", parent_id)
}

impl CartStore {
    pub fn new(session: Arc<dyn SessionStorage>) -> Self {
        Self { session }
    }

    pub async fn load_cart(&self, parent_id: i64) -> DomainResult<Cart> {
        match self.session.get(&cart_key(parent_id)).await? {
            Some(blob) => match serde_json::from_str(&blob) {
                Ok(cart) => Ok(cart),
                Err(e) => {
                    warn!("Stored cart for parent {} is unreadable, starting empty: {}", parent_id, e);
                    Ok(Cart::new())
                }
            },
            None => {
                debug!("No cart stored for parent {}", parent_id);
                Ok(Cart::new())
            }
        }
    }

    pub async fn save_cart(&self, parent_id: i64, cart: &Cart) -> DomainResult<()> {
        let blob = serde_json::to_string(cart)
            .map_err(|e| anyhow::anyhow!("failed to serialize cart: {}", e))?;
        self.session.set(&cart_key(parent_id), &blob).await?;
        Ok(())
    }

    pub async fn clear_cart(&self, parent_id: i64) -> DomainResult<()> {
        self.session.remove(&cart_key(parent_id)).await?;
        Ok(())
    }

    pub async fn load_selected_child(&self, parent_id: i64) -> DomainResult<Option<i64>> {
        match self.session.get(&selected_child_key(parent_id)).await? {
            Some(value) => match value.parse::<i64>() {
                Ok(child_id) => Ok(Some(child_id)),
                Err(_) => {
                    warn!("Stored child selection for parent {} is not an id: {:?}", parent_id, value);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub async fn save_selected_child(&self, parent_id: i64, child_id: i64) -> DomainResult<()> {
        self.session
            .set(&selected_child_key(parent_id), &child_id.to_string())
            .await?;
        Ok(())
    }

    pub async fn clear_selected_child(&self, parent_id: i64) -> DomainResult<()> {
        self.session.remove(&selected_child_key(parent_id)).await?;
        Ok(())
    }

    pub async fn load_custom_meal(&self, parent_id: i64) -> DomainResult<CustomMeal> {
        match self.session.get(&custom_meal_key(parent_id)).await? {
            Some(blob) => match serde_json::from_str(&blob) {
                Ok(meal) => Ok(meal),
                Err(e) => {
                    warn!(
                        "Stored custom meal for parent {} is unreadable, starting empty: {}",
                        parent_id, e
                    );
                    Ok(CustomMeal::new())
                }
            },
            None => Ok(CustomMeal::new()),
        }
    }

    pub async fn save_custom_meal(&self, parent_id: i64, meal: &CustomMeal) -> DomainResult<()> {
        let blob = serde_json::to_string(meal)
            .map_err(|e| anyhow::anyhow!("failed to serialize custom meal: {}", e))?;
        self.session.set(&custom_meal_key(parent_id), &blob).await?;
        Ok(())
    }

    pub async fn clear_custom_meal(&self, parent_id: i64) -> DomainResult<()> {
        self.session.remove(&custom_meal_key(parent_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::cart::{CartEntry, CartEntryKind};
    use crate::storage::sqlite::{DbConnection, SessionRepository};
    use rust_decimal_macros::dec;

    async fn setup_store() -> CartStore {
        let db = DbConnection::init_test()
            .await
            .expect("Failed to create test database");
        CartStore::new(Arc::new(SessionRepository::new(db)))
    }

    fn sample_entry() -> CartEntry {
        CartEntry {
            kind: CartEntryKind::PremadeMeal,
            reference_id: 7,
            name: "Turkey Wrap".to_string(),
            unit_price: dec!(5.50),
            quantity: 2,
            image_url: Some("turkey.png".to_string()),
            description: Some("Sliced turkey on a wrap".to_string()),
        }
    }

    #[tokio::test]
    async fn test_missing_cart_loads_empty() {
        let store = setup_store().await;
        let cart = store.load_cart(1).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_cart_round_trip_is_lossless() {
        let store = setup_store().await;

        let mut cart = Cart::new();
        cart.add_or_merge(sample_entry());
        store.save_cart(1, &cart).await.unwrap();

        let loaded = store.load_cart(1).await.unwrap();
        assert_eq!(loaded, cart);
    }

    #[tokio::test]
    async fn test_unreadable_blob_loads_empty() {
        let store = setup_store().await;

        store
            .session
            .set(&cart_key(1), "not json at all")
            .await
            .unwrap();

        let cart = store.load_cart(1).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_carts_are_scoped_per_parent() {
        let store = setup_store().await;

        let mut cart = Cart::new();
        cart.add_or_merge(sample_entry());
        store.save_cart(1, &cart).await.unwrap();

        let other = store.load_cart(2).await.unwrap();
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn test_selected_child_round_trip() {
        let store = setup_store().await;

        assert_eq!(store.load_selected_child(1).await.unwrap(), None);

        store.save_selected_child(1, 42).await.unwrap();
        assert_eq!(store.load_selected_child(1).await.unwrap(), Some(42));

        store.clear_selected_child(1).await.unwrap();
        assert_eq!(store.load_selected_child(1).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_cart_leaves_other_keys() {
        let store = setup_store().await;

        let mut cart = Cart::new();
        cart.add_or_merge(sample_entry());
        store.save_cart(1, &cart).await.unwrap();
        store.save_selected_child(1, 42).await.unwrap();

        store.clear_cart(1).await.unwrap();

        assert!(store.load_cart(1).await.unwrap().is_empty());
        // Clearing the cart alone does not clear the selection; the services
        // decide when the two go together.
        assert_eq!(store.load_selected_child(1).await.unwrap(), Some(42));
    }
}
