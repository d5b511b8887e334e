use serde::{Deserialize, Serialize};

/// A guardian account able to place orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parent {
    pub parent_id: i64,
    /// The login account this parent profile belongs to
    pub user_id: i64,
    pub name: String,
}

/// A child an order is placed for. Ownership is what authorization checks
/// are based on: a parent may only select and order for their own children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub child_id: i64,
    pub parent_id: i64,
    pub name: String,
}

impl Child {
    pub fn belongs_to(&self, parent: &Parent) -> bool {
        self.parent_id == parent.parent_id
    }
}
