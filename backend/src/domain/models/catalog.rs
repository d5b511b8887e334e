use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::custom_meal::Nutrition;

/// A base item from the catalog, with its allergy tags already resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i64,
    pub name: String,
    pub category: String,
    pub unit_price: Decimal,
    pub description: Option<String>,
    pub nutrition: Nutrition,
    pub allergies: Vec<String>,
}

/// A pre-made meal from the lunchbox menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreMadeMeal {
    pub meal_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub fixed_price: Decimal,
}

/// A named set of items a parent saved for quick reordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedMeal {
    pub saved_meal_id: i64,
    pub parent_id: i64,
    pub child_id: i64,
    pub name: String,
    pub item_ids: Vec<i64>,
}

/// Saved meal fields as handed to the store for creation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSavedMeal {
    pub parent_id: i64,
    pub child_id: i64,
    pub name: String,
    pub item_ids: Vec<i64>,
}
