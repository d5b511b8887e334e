use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What a cart entry refers to in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartEntryKind {
    /// A pre-made meal from the lunchbox menu
    PremadeMeal,
    /// An individual base item (fruit, drink, sandwich component, ...)
    BaseItem,
}

/// A single cart line as rendered to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntryView {
    pub kind: CartEntryKind,
    /// Catalog id of the meal or item this entry refers to
    pub reference_id: i64,
    pub name: String,
    /// Unit price as a fixed-point decimal string (e.g. "5.50")
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

/// The whole cart plus its derived total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartView {
    pub entries: Vec<CartEntryView>,
    pub total: Decimal,
    /// Currently selected child for this order, if any
    pub selected_child_id: Option<i64>,
}

/// Nutrition snapshot carried on custom meal entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NutritionView {
    pub calories: u32,
    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
}

/// A single line in the custom meal builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMealEntryView {
    pub item_id: i64,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub nutrition: NutritionView,
    pub allergies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMealView {
    pub entries: Vec<CustomMealEntryView>,
    pub total: Decimal,
}

/// Request to add a pre-made meal to the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddToCartRequest {
    pub user_id: i64,
    pub meal_id: i64,
    pub quantity: u32,
}

/// Request to bump a cart entry's quantity up or down.
///
/// A negative delta decreases; the quantity never drops below 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustQuantityRequest {
    pub user_id: i64,
    pub kind: CartEntryKind,
    pub reference_id: i64,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveFromCartRequest {
    pub user_id: i64,
    pub kind: CartEntryKind,
    pub reference_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectChildRequest {
    pub user_id: i64,
    pub child_id: i64,
}

/// Payment methods accepted at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Cash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub user_id: i64,
    /// Requested delivery date (must be strictly in the future)
    pub delivery_date: NaiveDate,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutResponse {
    pub order_id: i64,
    pub total_amount: Decimal,
}

/// Request to add a base item to the custom meal builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddCustomMealItemRequest {
    pub user_id: i64,
    pub item_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustCustomMealItemRequest {
    pub user_id: i64,
    pub item_id: i64,
    pub delta: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoveCustomMealItemRequest {
    pub user_id: i64,
    pub item_id: i64,
}

/// Request to persist the current custom meal as a named favorite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveFavoriteRequest {
    pub user_id: i64,
    pub child_id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMealView {
    pub saved_meal_id: i64,
    pub child_id: i64,
    pub name: String,
    pub item_ids: Vec<i64>,
}

/// Confirmation of a child selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectChildResponse {
    pub child_id: i64,
    pub name: String,
}

/// Result of merging a past order or saved meal into the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReorderResponse {
    pub cart: CartView,
    /// Lines resolved against the current catalog and merged
    pub merged_lines: usize,
    /// Lines skipped because their catalog record no longer exists
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteSavedMealResponse {
    pub message: String,
}

/// Request carrying only the caller's identity (reorder, clear, view).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRequest {
    pub user_id: i64,
}

/// Error payload returned for every rejected operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable kind, e.g. "empty_cart" or "authorization"
    pub kind: String,
    pub message: String,
}
