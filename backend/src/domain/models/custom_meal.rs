use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Nutrition facts snapshotted from the catalog when an item is added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: u32,
    pub protein_g: Decimal,
    pub carbs_g: Decimal,
    pub fat_g: Decimal,
}

/// A base item staged in the custom meal builder.
///
/// Nutrition and allergy tags are captured at add-time and never re-fetched,
/// so the builder keeps showing what the parent saw when they picked the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomMealEntry {
    pub item_id: i64,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub nutrition: Nutrition,
    pub allergies: Vec<String>,
}

/// Staging area for assembling a meal from base items before it is promoted
/// into the cart or saved as a favorite. Keyed by item id, same merge and
/// quantity rules as the cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CustomMealEntry>", into = "Vec<CustomMealEntry>")]
pub struct CustomMeal {
    entries: HashMap<i64, CustomMealEntry>,
}

impl CustomMeal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, item_id: i64) -> Option<&CustomMealEntry> {
        self.entries.get(&item_id)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CustomMealEntry> {
        self.entries.values()
    }

    pub fn item_ids(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.entries.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn add_or_merge(&mut self, entry: CustomMealEntry) {
        match self.entries.get_mut(&entry.item_id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(entry.quantity);
            }
            None => {
                self.entries.insert(entry.item_id, entry);
            }
        }
    }

    /// Apply a signed delta to an item's quantity, clamped at a minimum of 1.
    /// The addition saturates so caller-supplied extremes cannot overflow.
    /// Unknown items are a no-op.
    pub fn adjust_quantity(&mut self, item_id: i64, delta: i64) {
        if let Some(entry) = self.entries.get_mut(&item_id) {
            let adjusted = i64::from(entry.quantity)
                .saturating_add(delta)
                .clamp(1, i64::from(u32::MAX));
            entry.quantity = adjusted as u32;
        }
    }

    pub fn remove(&mut self, item_id: i64) -> bool {
        self.entries.remove(&item_id).is_some()
    }

    pub fn total(&self) -> Decimal {
        self.entries
            .values()
            .map(|e| e.unit_price * Decimal::from(e.quantity))
            .sum()
    }
}

impl From<Vec<CustomMealEntry>> for CustomMeal {
    fn from(entries: Vec<CustomMealEntry>) -> Self {
        let mut meal = CustomMeal::new();
        for entry in entries {
            meal.add_or_merge(entry);
        }
        meal
    }
}

impl From<CustomMeal> for Vec<CustomMealEntry> {
    fn from(meal: CustomMeal) -> Self {
        meal.entries.into_values().collect()
    }
}
