//! # Storage Traits
//!
//! Contracts the domain layer consumes. Each trait abstracts one collaborator
//! so the services can run against any backend (SQLite here, anything else in
//! tests) without modification.

use anyhow::Result;
use async_trait::async_trait;

use crate::domain::models::catalog::{Item, NewSavedMeal, PreMadeMeal, SavedMeal};
use crate::domain::models::family::{Child, Parent};
use crate::domain::models::order::{NewOrder, NewOrderLine, NewPayment, Order, OrderLine};

/// Per-principal key/value blob storage backing the session cart.
///
/// Keys are scoped by the caller (e.g. `cart::{parent_id}`); the store itself
/// has no knowledge of what the blobs contain.
#[async_trait]
pub trait SessionStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns true if a value was present and removed
    async fn remove(&self, key: &str) -> Result<bool>;
}

/// Read-only catalog lookups. Allergy tags come back already resolved as
/// plain strings; the domain never traverses the item/allergy graph itself.
#[async_trait]
pub trait CatalogStorage: Send + Sync {
    async fn get_item(&self, item_id: i64) -> Result<Option<Item>>;

    async fn get_meal(&self, meal_id: i64) -> Result<Option<PreMadeMeal>>;
}

/// Parent/child graph lookups used for ownership checks.
#[async_trait]
pub trait FamilyStorage: Send + Sync {
    async fn get_parent_by_user(&self, user_id: i64) -> Result<Option<Parent>>;

    async fn get_child(&self, child_id: i64) -> Result<Option<Child>>;
}

/// Durable order storage.
#[async_trait]
pub trait OrderStorage: Send + Sync {
    /// Persist an order header, its lines, and its payment record as ONE
    /// atomic write. Either all of them become visible or none do.
    async fn create_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
        payment: &NewPayment,
    ) -> Result<i64>;

    async fn get_order_with_lines(&self, order_id: i64)
        -> Result<Option<(Order, Vec<OrderLine>)>>;
}

/// Storage for named favorites.
#[async_trait]
pub trait SavedMealStorage: Send + Sync {
    /// Persist the saved meal and its item links atomically.
    async fn create_saved_meal(&self, saved_meal: &NewSavedMeal) -> Result<i64>;

    async fn get_saved_meal(&self, saved_meal_id: i64) -> Result<Option<SavedMeal>>;

    /// List a parent's saved meals, most recently created first.
    async fn list_saved_meals(&self, parent_id: i64) -> Result<Vec<SavedMeal>>;

    /// Returns true if the saved meal existed and was deleted
    async fn delete_saved_meal(&self, saved_meal_id: i64) -> Result<bool>;
}
