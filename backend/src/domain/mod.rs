//! # Domain Module
//!
//! Business logic for the lunchbox ordering core: the session cart, the
//! custom meal builder, checkout, and the adapters that feed past orders and
//! saved favorites back into the cart.
//!
//! ## Module Organization
//!
//! - **cart_store**: typed load/save/clear over the session store; the only
//!   place that knows how carts are keyed and serialized
//! - **cart_service**: cart mutators (add, adjust, remove, clear), totals,
//!   and child selection with ownership checks
//! - **custom_meal_service**: the builder for assembling a meal from base
//!   items, promoting it into the cart, or saving it as a favorite
//! - **checkout_service**: validates the cart and atomically converts it into
//!   an order, its lines, and a payment record
//! - **reorder_service**: merges a past order's or a saved meal's items back
//!   into the current cart
//! - **saved_meal_service**: listing and deleting a parent's favorites
//!
//! ## Key Rules
//!
//! - Cart and builder entries are keyed by identity; adding a duplicate key
//!   merges quantities instead of creating a second line
//! - Quantities never drop below 1; a decrement at 1 is a no-op
//! - Every mutator is load → pure transform → save; nothing partially applies
//! - Child ownership is checked at selection and re-checked at checkout
//! - The order aggregate (header + lines + payment) is written atomically;
//!   a failed checkout leaves no partial order and keeps the cart intact

pub mod cart_service;
pub mod cart_store;
pub mod checkout_service;
pub mod commands;
pub mod custom_meal_service;
pub mod errors;
pub mod models;
pub mod reorder_service;
pub mod saved_meal_service;

pub use cart_service::CartService;
pub use cart_store::CartStore;
pub use checkout_service::CheckoutService;
pub use custom_meal_service::CustomMealService;
pub use errors::{DomainError, DomainResult};
pub use reorder_service::ReorderService;
pub use saved_meal_service::SavedMealService;

use crate::domain::models::family::Parent;
use crate::storage::traits::FamilyStorage;

/// Resolve the acting parent from the caller's user id. Every operation the
/// core exposes starts here; a missing profile means the caller cannot own a
/// cart at all.
pub(crate) async fn resolve_parent(
    family: &dyn FamilyStorage,
    user_id: i64,
) -> DomainResult<Parent> {
    family
        .get_parent_by_user(user_id)
        .await?
        .ok_or_else(|| DomainError::NotFound(format!("no parent profile for user {}", user_id)))
}
