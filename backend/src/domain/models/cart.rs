use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What a cart entry refers to in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CartEntryKind {
    PremadeMeal,
    BaseItem,
}

/// Identity of a cart entry: the kind plus the catalog id it refers to.
///
/// Two entries with the same key are never stored side by side; adding a
/// duplicate merges quantities instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CartEntryKey {
    pub kind: CartEntryKind,
    pub reference_id: i64,
}

/// A single purchasable line in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartEntry {
    pub kind: CartEntryKind,
    pub reference_id: i64,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image_url: Option<String>,
    pub description: Option<String>,
}

impl CartEntry {
    pub fn key(&self) -> CartEntryKey {
        CartEntryKey {
            kind: self.kind,
            reference_id: self.reference_id,
        }
    }
}

/// Session-scoped mapping of purchasable entries awaiting checkout.
///
/// Serialized as a flat list of entries; duplicate keys in a stored blob are
/// merged on load so the uniqueness invariant holds even for hand-edited data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<CartEntry>", into = "Vec<CartEntry>")]
pub struct Cart {
    entries: HashMap<CartEntryKey, CartEntry>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, key: &CartEntryKey) -> Option<&CartEntry> {
        self.entries.get(key)
    }

    pub fn entries(&self) -> impl Iterator<Item = &CartEntry> {
        self.entries.values()
    }

    /// Insert an entry, or merge its quantity into an existing entry with the
    /// same key. The existing entry's descriptive fields win on merge.
    pub fn add_or_merge(&mut self, entry: CartEntry) {
        match self.entries.get_mut(&entry.key()) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(entry.quantity);
            }
            None => {
                self.entries.insert(entry.key(), entry);
            }
        }
    }

    /// Apply a signed delta to an entry's quantity, clamped so it never drops
    /// below 1. The delta comes straight from the caller, so the addition
    /// saturates instead of overflowing. Unknown keys are a no-op.
    pub fn adjust_quantity(&mut self, key: &CartEntryKey, delta: i64) {
        if let Some(entry) = self.entries.get_mut(key) {
            let adjusted = i64::from(entry.quantity)
                .saturating_add(delta)
                .clamp(1, i64::from(u32::MAX));
            entry.quantity = adjusted as u32;
        }
    }

    /// Remove an entry. Returns whether anything was removed.
    pub fn remove(&mut self, key: &CartEntryKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Sum of unit price times quantity across all entries.
    pub fn total(&self) -> Decimal {
        self.entries
            .values()
            .map(|e| e.unit_price * Decimal::from(e.quantity))
            .sum()
    }
}

impl From<Vec<CartEntry>> for Cart {
    fn from(entries: Vec<CartEntry>) -> Self {
        let mut cart = Cart::new();
        for entry in entries {
            cart.add_or_merge(entry);
        }
        cart
    }
}

impl From<Cart> for Vec<CartEntry> {
    fn from(cart: Cart) -> Self {
        cart.entries.into_values().collect()
    }
}
