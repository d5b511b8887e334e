//! Domain-level command and result types.
//!
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod cart {
    use crate::domain::models::cart::{Cart, CartEntryKey};
    use crate::domain::models::family::Child;

    /// Input for adding a pre-made meal to the cart.
    #[derive(Debug, Clone)]
    pub struct AddMealToCartCommand {
        pub user_id: i64,
        pub meal_id: i64,
        pub quantity: u32,
    }

    /// Input for bumping an entry's quantity up or down.
    #[derive(Debug, Clone)]
    pub struct AdjustQuantityCommand {
        pub user_id: i64,
        pub key: CartEntryKey,
        pub delta: i64,
    }

    /// Input for removing one entry from the cart.
    #[derive(Debug, Clone)]
    pub struct RemoveEntryCommand {
        pub user_id: i64,
        pub key: CartEntryKey,
    }

    /// Input for marking which child the order is for.
    #[derive(Debug, Clone)]
    pub struct SelectChildCommand {
        pub user_id: i64,
        pub child_id: i64,
    }

    /// Result of selecting a child.
    #[derive(Debug, Clone)]
    pub struct SelectChildResult {
        pub child: Child,
    }

    /// The cart plus its session-scoped selection marker.
    #[derive(Debug, Clone)]
    pub struct CartSnapshot {
        pub cart: Cart,
        pub selected_child_id: Option<i64>,
    }
}

pub mod custom_meal {
    use crate::domain::models::catalog::SavedMeal;

    /// Input for adding a base item to the custom meal builder.
    #[derive(Debug, Clone)]
    pub struct AddItemCommand {
        pub user_id: i64,
        pub item_id: i64,
        pub quantity: u32,
    }

    #[derive(Debug, Clone)]
    pub struct AdjustItemCommand {
        pub user_id: i64,
        pub item_id: i64,
        pub delta: i64,
    }

    #[derive(Debug, Clone)]
    pub struct RemoveItemCommand {
        pub user_id: i64,
        pub item_id: i64,
    }

    /// Input for persisting the current custom meal as a named favorite.
    #[derive(Debug, Clone)]
    pub struct SaveFavoriteCommand {
        pub user_id: i64,
        pub child_id: i64,
        pub name: String,
    }

    #[derive(Debug, Clone)]
    pub struct SaveFavoriteResult {
        pub saved_meal: SavedMeal,
    }
}

pub mod checkout {
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::domain::models::order::PaymentMethod;

    /// Input for converting the cart into a persisted order.
    #[derive(Debug, Clone)]
    pub struct CheckoutCommand {
        pub user_id: i64,
        pub delivery_date: NaiveDate,
        pub payment_method: PaymentMethod,
    }

    /// Result of a committed checkout, for the confirmation display.
    #[derive(Debug, Clone)]
    pub struct CheckoutResult {
        pub order_id: i64,
        pub total_amount: Decimal,
    }
}

pub mod reorder {
    use crate::domain::models::cart::Cart;

    /// Input for merging a past order's lines back into the cart.
    #[derive(Debug, Clone)]
    pub struct ReorderOrderCommand {
        pub user_id: i64,
        pub order_id: i64,
    }

    /// Input for merging a saved favorite's items into the cart.
    #[derive(Debug, Clone)]
    pub struct ReorderSavedMealCommand {
        pub user_id: i64,
        pub saved_meal_id: i64,
    }

    #[derive(Debug, Clone)]
    pub struct ReorderResult {
        pub cart: Cart,
        /// Lines that could be resolved against the current catalog
        pub merged_lines: usize,
        /// Lines skipped because their catalog record no longer exists
        pub skipped_lines: usize,
    }
}

pub mod saved_meal {
    use crate::domain::models::catalog::SavedMeal;

    #[derive(Debug, Clone)]
    pub struct ListSavedMealsCommand {
        pub user_id: i64,
    }

    #[derive(Debug, Clone)]
    pub struct ListSavedMealsResult {
        pub saved_meals: Vec<SavedMeal>,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteSavedMealCommand {
        pub user_id: i64,
        pub saved_meal_id: i64,
    }

    #[derive(Debug, Clone)]
    pub struct DeleteSavedMealResult {
        pub success_message: String,
    }
}
